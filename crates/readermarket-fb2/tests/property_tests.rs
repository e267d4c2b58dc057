//! Property-Based Tests
//!
//! Generated FB2 bodies checked against the parser's structural invariants:
//! - Chapter ids are 1..=N in section order
//! - Untitled sections are named "Chapter {id}"
//! - Block elements map to the fixed output vocabulary
//! - Arbitrary text never panics the parser

use proptest::prelude::*;
use readermarket_fb2::parse_fb2_str;

/// A section-level block and the markup it must render to
#[derive(Debug, Clone)]
enum Block {
    Paragraph(String),
    EmptyLine,
    Poem(String),
    Cite(String),
    Epigraph(String),
    Ignored(String),
}

impl Block {
    fn source(&self) -> String {
        match self {
            Self::Paragraph(t) => format!("<p>{t}</p>"),
            Self::EmptyLine => "<empty-line/>".to_string(),
            Self::Poem(t) => format!("<poem><stanza><v>{t}</v></stanza></poem>"),
            Self::Cite(t) => format!("<cite><p>{t}</p></cite>"),
            Self::Epigraph(t) => format!("<epigraph><p>{t}</p></epigraph>"),
            Self::Ignored(t) => format!("<subtitle>{t}</subtitle>"),
        }
    }

    fn rendered(&self) -> String {
        match self {
            Self::Paragraph(t) => format!("<p>{t}</p>"),
            Self::EmptyLine => "<br/>".to_string(),
            Self::Poem(t) => format!(r#"<div class="poem"><stanza><v>{t}</v></stanza></div>"#),
            Self::Cite(t) => format!(r#"<blockquote class="citation"><p>{t}</p></blockquote>"#),
            Self::Epigraph(t) => format!(r#"<div class="epigraph"><p>{t}</p></div>"#),
            Self::Ignored(_) => String::new(),
        }
    }
}

fn word() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ]{0,20}"
}

fn arb_block() -> impl Strategy<Value = Block> {
    prop_oneof![
        word().prop_map(Block::Paragraph),
        Just(Block::EmptyLine),
        word().prop_map(Block::Poem),
        word().prop_map(Block::Cite),
        word().prop_map(Block::Epigraph),
        word().prop_map(Block::Ignored),
    ]
}

/// (optional title, blocks) per section
fn arb_sections() -> impl Strategy<Value = Vec<(Option<String>, Vec<Block>)>> {
    prop::collection::vec(
        (prop::option::of(word()), prop::collection::vec(arb_block(), 0..6)),
        1..12,
    )
}

fn render_book(sections: &[(Option<String>, Vec<Block>)]) -> String {
    let mut body = String::from("<body>");
    for (title, blocks) in sections {
        body.push_str("<section>");
        if let Some(title) = title {
            body.push_str(&format!("<title><p>{title}</p></title>"));
        }
        for block in blocks {
            body.push_str(&block.source());
        }
        body.push_str("</section>");
    }
    body.push_str("</body>");

    format!("<FictionBook><description><title-info><book-title>Generated</book-title></title-info></description>{body}</FictionBook>")
}

proptest! {
    /// Property: chapter ids are contiguous and follow section order
    #[test]
    fn proptest_ids_contiguous(sections in arb_sections()) {
        let doc = parse_fb2_str(&render_book(&sections)).unwrap();

        prop_assert_eq!(doc.chapters.len(), sections.len());
        for (i, chapter) in doc.chapters.iter().enumerate() {
            prop_assert_eq!(chapter.id, i + 1);
        }
    }

    /// Property: titles come from the title block, or fall back to "Chapter {id}"
    #[test]
    fn proptest_titles(sections in arb_sections()) {
        let doc = parse_fb2_str(&render_book(&sections)).unwrap();

        for (chapter, (title, _)) in doc.chapters.iter().zip(&sections) {
            let expected = match title.as_deref().map(str::trim) {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => format!("Chapter {}", chapter.id),
            };
            prop_assert_eq!(&chapter.title, &expected);
        }
    }

    /// Property: content is the concatenation of each block's mapped markup
    #[test]
    fn proptest_content_mapping(sections in arb_sections()) {
        let doc = parse_fb2_str(&render_book(&sections)).unwrap();

        for (chapter, (_, blocks)) in doc.chapters.iter().zip(&sections) {
            let expected: String = blocks.iter().map(Block::rendered).collect();
            prop_assert_eq!(&chapter.content, &expected);
            prop_assert!(!chapter.content.contains("<title>"));
        }
    }

    /// Property: arbitrary input either parses or fails as malformed, never panics
    #[test]
    fn proptest_arbitrary_input_no_panic(text in "\\PC{0,200}") {
        if let Err(e) = parse_fb2_str(&text) {
            prop_assert!(e.is_malformed());
        }
    }
}
