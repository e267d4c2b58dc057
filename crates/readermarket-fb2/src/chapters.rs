//! Chapter extraction from `<body>`
//!
//! Each direct `<section>` child of the body becomes one chapter. Section
//! content is rendered into a small fixed tag vocabulary that the reading UI
//! understands:
//!
//! | FB2 element    | Emitted markup                              |
//! |----------------|---------------------------------------------|
//! | `<p>`          | `<p>…</p>`                                  |
//! | `<epigraph>`   | `<div class="epigraph">…</div>`             |
//! | `<poem>`       | `<div class="poem">…</div>`                 |
//! | `<cite>`       | `<blockquote class="citation">…</blockquote>` |
//! | `<empty-line>` | `<br/>`                                     |
//!
//! Everything else at section level (including nested sections) is dropped.
//! Inline markup inside these elements is kept as serialized.

use crate::types::Chapter;
use crate::xml::{ElementKind, XmlElement};

/// Title used for the synthesized chapter when the book has no title.
pub const FALLBACK_CHAPTER_TITLE: &str = "Main Content";

/// Separator between the paragraphs of a multi-line section title.
pub const TITLE_SEPARATOR: &str = " - ";

/// Line-break marker emitted for `<empty-line>`.
pub const LINE_BREAK: &str = "<br/>";

/// Extract chapters from a `<body>` element
///
/// A body without direct sections still yields one chapter built from its
/// loose paragraphs, titled after the book.
#[must_use]
pub fn extract_chapters(body: &XmlElement, book_title: &str) -> Vec<Chapter> {
    let chapters: Vec<Chapter> = body
        .children_of(ElementKind::Section)
        .enumerate()
        .map(|(index, section)| {
            let id = index + 1;
            Chapter::new(id, section_title(section, id), section_content(section))
        })
        .collect();

    if chapters.is_empty() {
        log::debug!("body has no sections, synthesizing a single chapter");
        return vec![fallback_chapter(body, book_title)];
    }

    log::debug!("extracted {} chapters", chapters.len());
    chapters
}

/// Paragraph texts of the section's `<title>`, joined; "Chapter {id}" if none.
fn section_title(section: &XmlElement, id: usize) -> String {
    let title = section
        .child(ElementKind::Title)
        .map(|title| {
            title
                .descendants()
                .filter(|el| el.kind == ElementKind::Paragraph)
                .map(|p| p.text_content().trim().to_string())
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(TITLE_SEPARATOR)
        })
        .unwrap_or_default();

    if title.is_empty() {
        format!("Chapter {id}")
    } else {
        title
    }
}

fn section_content(section: &XmlElement) -> String {
    let mut content = String::new();
    for child in section.elements() {
        render_block(child, &mut content);
    }
    content
}

fn render_block(el: &XmlElement, out: &mut String) {
    match el.kind {
        ElementKind::Paragraph => wrap(out, "<p>", el, "</p>"),
        ElementKind::Epigraph => wrap(out, r#"<div class="epigraph">"#, el, "</div>"),
        ElementKind::Poem => wrap(out, r#"<div class="poem">"#, el, "</div>"),
        ElementKind::Cite => wrap(out, r#"<blockquote class="citation">"#, el, "</blockquote>"),
        ElementKind::EmptyLine => out.push_str(LINE_BREAK),
        // the title is already consumed by section_title
        _ => {}
    }
}

fn wrap(out: &mut String, open: &str, el: &XmlElement, close: &str) {
    out.push_str(open);
    out.push_str(&el.inner_markup());
    out.push_str(close);
}

/// Single chapter for a body without sections.
///
/// Direct paragraphs are kept, and so are the direct paragraphs of any
/// section met at this level. Deeper content is not visited.
fn fallback_chapter(body: &XmlElement, book_title: &str) -> Chapter {
    let mut content = String::new();
    for child in body.elements() {
        match child.kind {
            ElementKind::Paragraph => wrap(&mut content, "<p>", child, "</p>"),
            ElementKind::Section => {
                for p in child.children_of(ElementKind::Paragraph) {
                    wrap(&mut content, "<p>", p, "</p>");
                }
            }
            _ => {}
        }
    }

    let title = if book_title.is_empty() {
        FALLBACK_CHAPTER_TITLE.to_string()
    } else {
        book_title.to_string()
    };

    Chapter::new(1, title, content)
}
