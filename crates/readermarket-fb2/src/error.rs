/// Error types for FB2 loading and parsing
use std::io;

/// Result type alias for FB2 operations
pub type Result<T> = std::result::Result<T, Fb2Error>;

/// Errors that can occur while loading or parsing an FB2 document
///
/// Only [`Fb2Error::MalformedInput`] is produced by the parser. Every other
/// variant comes from acquiring the source text.
#[derive(Debug, thiserror::Error)]
pub enum Fb2Error {
    /// Input is not well-formed markup
    #[error("Malformed FB2 markup: {0}")]
    MalformedInput(String),

    /// Standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive extraction error
    #[error("Failed to extract ZIP: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Archive does not contain an FB2 entry
    #[error("Missing required file: {0}")]
    MissingFile(String),

    /// Input rejected before parsing (size limit, not a file)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Fb2Error {
    /// Returns true if the error came from the parser rather than the loader.
    #[inline]
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }
}

impl From<quick_xml::Error> for Fb2Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Fb2Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::MalformedInput(err.to_string())
    }
}
