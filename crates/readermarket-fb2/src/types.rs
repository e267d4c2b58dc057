/// Document types produced by the FB2 parser
use serde::{Deserialize, Serialize};

/// Book metadata taken from the first `<title-info>` block
///
/// `title` and `author` default to an empty string. The remaining fields are
/// only set when the corresponding element exists in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Book title (`<book-title>`)
    pub title: String,

    /// First author as "first last", trimmed
    pub author: String,

    /// Trimmed text of `<annotation>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Genre code (e.g. `sf_fantasy`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    /// Language code (e.g. "en", "ru")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Publication date, machine-readable `value` attribute preferred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl DocumentMetadata {
    /// Creates empty metadata.
    #[inline]
    #[must_use = "creates empty metadata"]
    pub const fn new() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            description: None,
            genre: None,
            language: None,
            date: None,
        }
    }
}

/// One chapter extracted from a `<section>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chapter {
    /// 1-based position among the extracted chapters
    pub id: usize,

    /// Chapter heading
    pub title: String,

    /// Restricted HTML markup (`<p>`, `<br/>`, `<div class=..>`, `<blockquote class=..>`)
    pub content: String,
}

impl Chapter {
    /// Creates a chapter with the given position, title and content.
    #[inline]
    #[must_use = "creates chapter with content"]
    pub const fn new(id: usize, title: String, content: String) -> Self {
        Self { id, title, content }
    }
}

/// Parsed FB2 document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Book metadata
    pub metadata: DocumentMetadata,

    /// Chapters in reading order
    pub chapters: Vec<Chapter>,
}

impl ParsedDocument {
    /// Creates a document with the given metadata and no chapters.
    #[inline]
    #[must_use = "creates empty document structure"]
    pub const fn new(metadata: DocumentMetadata) -> Self {
        Self {
            metadata,
            chapters: Vec::new(),
        }
    }
}
