//! Metadata extraction from `<title-info>`
//!
//! Only the first `<title-info>` in the document is read (FB2 also allows
//! `<src-title-info>` for translations, which is ignored). Every field is
//! independently optional: a missing element leaves its field at the
//! default and never fails the parse.

use crate::types::DocumentMetadata;
use crate::xml::{ElementKind, XmlElement};

/// Extract book metadata from the document tree.
#[must_use]
pub fn extract_metadata(root: &XmlElement) -> DocumentMetadata {
    let Some(info) = root.find_in_tree(ElementKind::TitleInfo) else {
        log::debug!("no <title-info> block, using empty metadata");
        return DocumentMetadata::new();
    };

    DocumentMetadata {
        title: info
            .find(ElementKind::BookTitle)
            .map(XmlElement::text_content)
            .unwrap_or_default(),
        author: info.find(ElementKind::Author).map(author_name).unwrap_or_default(),
        description: info
            .find(ElementKind::Annotation)
            .map(|annotation| annotation.text_content().trim().to_string()),
        genre: info.find(ElementKind::Genre).map(XmlElement::text_content),
        language: info.find(ElementKind::Lang).map(XmlElement::text_content),
        date: info.find(ElementKind::Date).map(date_value),
    }
}

/// "first last" from an `<author>` block; middle name and nickname are not used.
fn author_name(author: &XmlElement) -> String {
    let part = |kind| {
        author
            .find(kind)
            .map(XmlElement::text_content)
            .unwrap_or_default()
    };
    format!("{} {}", part(ElementKind::FirstName), part(ElementKind::LastName))
        .trim()
        .to_string()
}

/// `<date value="2004-05-12">May 2004</date>` yields the attribute.
fn date_value(date: &XmlElement) -> String {
    date.attribute("value")
        .filter(|value| !value.is_empty())
        .map_or_else(|| date.text_content(), str::to_string)
}
