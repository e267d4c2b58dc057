//! # readermarket-fb2
//!
//! `FictionBook` (FB2) parser for Reader.Market.
//!
//! Turns FB2 markup into book metadata plus an ordered list of chapters whose
//! content is a small, fixed HTML vocabulary the reading UI renders directly.
//!
//! ## Quick Start
//!
//! ```rust
//! use readermarket_fb2::parse_fb2_str;
//!
//! let xml = r#"<FictionBook>
//!   <description><title-info>
//!     <book-title>Test Book</book-title>
//!     <author><first-name>Jane</first-name><last-name>Doe</last-name></author>
//!   </title-info></description>
//!   <body>
//!     <section><title><p>Intro</p></title><p>Welcome</p></section>
//!     <section><empty-line/></section>
//!   </body>
//! </FictionBook>"#;
//!
//! let book = parse_fb2_str(xml)?;
//! assert_eq!(book.metadata.author, "Jane Doe");
//! assert_eq!(book.chapters[0].content, "<p>Welcome</p>");
//! assert_eq!(book.chapters[1].title, "Chapter 2");
//! # Ok::<(), readermarket_fb2::Fb2Error>(())
//! ```
//!
//! ### Parse a File
//!
//! ```rust,no_run
//! use readermarket_fb2::parse_fb2_file;
//!
//! // Plain .fb2 or compressed .fb2.zip
//! let book = parse_fb2_file("novel.fb2.zip")?;
//! for chapter in &book.chapters {
//!     println!("{}. {}", chapter.id, chapter.title);
//! }
//! # Ok::<(), readermarket_fb2::Fb2Error>(())
//! ```
//!
//! ## Structure
//!
//! ### `ParsedDocument`
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `metadata` | `DocumentMetadata` | Book metadata |
//! | `chapters` | `Vec<Chapter>` | Chapters in reading order |
//!
//! ### `DocumentMetadata`
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `title` | `String` | Book title, empty if absent |
//! | `author` | `String` | First author, empty if absent |
//! | `description` | `Option<String>` | Annotation text |
//! | `genre` | `Option<String>` | Genre code |
//! | `language` | `Option<String>` | Language code |
//! | `date` | `Option<String>` | Publication date |
//!
//! ### `Chapter`
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `id` | `usize` | 1-based position |
//! | `title` | `String` | Section title or "Chapter N" |
//! | `content` | `String` | Rendered markup |
//!
//! ## Error Handling
//!
//! Only malformed markup fails a parse. Loading errors are separate variants:
//!
//! ```rust,no_run
//! use readermarket_fb2::{parse_fb2_file, Fb2Error};
//!
//! match parse_fb2_file("book.fb2") {
//!     Ok(book) => println!("Parsed {} chapters", book.chapters.len()),
//!     Err(Fb2Error::MalformedInput(e)) => println!("Bad markup: {}", e),
//!     Err(Fb2Error::Io(e)) => println!("File error: {}", e),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

/// Chapter extraction from `<body>`
pub mod chapters;
/// Error types for FB2 loading and parsing
pub mod error;
/// FB2 entry points
pub mod fb2;
/// Source loading and decoding
pub mod loader;
/// Metadata extraction from `<title-info>`
pub mod metadata;
/// Document types
pub mod types;
/// Typed XML tree
pub mod xml;

// Re-export commonly used items
pub use error::{Fb2Error, Result};
pub use fb2::{parse_fb2_file, parse_fb2_str};
pub use loader::{decode_fb2_bytes, load_fb2, LoadOptions};
pub use types::{Chapter, DocumentMetadata, ParsedDocument};
