/// `FictionBook` (FB2) document parser
///
/// FB2 is an XML-based e-book format popular in Russia and Eastern Europe.
/// A single XML file carries metadata, content and base64 images.
///
/// Format structure:
/// - `<description>`: metadata (`title-info`, `document-info`, `publish-info`)
/// - `<body>`: main content (sections with titles, paragraphs, poems)
/// - `<body name="notes">`: footnotes, not read here
/// - `<binary>`: base64-encoded images, not read here
///
/// References:
/// - Official XSD schema: <https://github.com/gribuser/fb2>
use crate::chapters::extract_chapters;
use crate::error::Result;
use crate::loader::{load_fb2, LoadOptions};
use crate::metadata::extract_metadata;
use crate::types::ParsedDocument;
use crate::xml::{parse_document, ElementKind};
use std::path::Path;

/// Parse FB2 markup
///
/// Pure function of its input: no I/O, no shared state, safe to call from
/// any number of threads at once.
///
/// # Errors
/// * `Fb2Error::MalformedInput` if `raw` is not well-formed XML. Missing
///   metadata, a missing body or missing sections are not errors.
#[must_use = "this function returns a parsed document that should be processed"]
pub fn parse_fb2_str(raw: &str) -> Result<ParsedDocument> {
    let root = parse_document(raw)?;

    let mut document = ParsedDocument::new(extract_metadata(&root));

    // The first <body> is the main text; a notes body follows it.
    match root.find_in_tree(ElementKind::Body) {
        Some(body) => document.chapters = extract_chapters(body, &document.metadata.title),
        None => log::debug!("document has no <body>, returning zero chapters"),
    }

    Ok(document)
}

/// Load and parse an FB2 file from path
///
/// Supports plain `.fb2` files and `.fb2.zip` archives.
///
/// # Errors
/// * File I/O and archive errors from the loader
/// * `Fb2Error::MalformedInput` if the decoded text is not well-formed
#[must_use = "this function returns a parsed document that should be processed"]
pub fn parse_fb2_file<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    let text = load_fb2(path.as_ref(), &LoadOptions::default())?;
    parse_fb2_str(&text)
}
