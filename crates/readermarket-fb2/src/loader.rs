//! Loading FB2 source text from disk
//!
//! The parser only ever sees decoded text. This module turns a `.fb2` file
//! or a `.fb2.zip` archive into that text, honoring the byte-order mark or
//! the encoding named in the XML declaration (`windows-1251` is common).

use crate::error::{Fb2Error, Result};
use encoding_rs::{Encoding, UTF_8};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// How many leading bytes are searched for the XML declaration.
const DECLARATION_SCAN_LIMIT: usize = 1024;

/// Options for reading FB2 sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject sources larger than this many bytes (uncompressed size for archives)
    pub max_size: Option<u64>,
}

impl LoadOptions {
    /// Options with a size limit.
    #[inline]
    #[must_use]
    pub const fn with_max_size(max_size: u64) -> Self {
        Self {
            max_size: Some(max_size),
        }
    }

    fn check_size(&self, size: u64, what: &str) -> Result<()> {
        match self.max_size {
            Some(limit) if size > limit => Err(Fb2Error::InvalidInput(format!(
                "{what} is {size} bytes, limit is {limit}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Load an FB2 file and decode it to text
///
/// # Errors
/// * `Fb2Error::Io` if the file cannot be read
/// * `Fb2Error::Zip` / `Fb2Error::MissingFile` for bad `.fb2.zip` archives
/// * `Fb2Error::InvalidInput` if the path is not a file or exceeds `max_size`
pub fn load_fb2(path: &Path, options: &LoadOptions) -> Result<String> {
    let bytes = load_fb2_bytes(path, options)?;
    Ok(decode_fb2_bytes(&bytes))
}

/// Load the raw bytes of an FB2 document (handles both .fb2 and .fb2.zip)
///
/// # Errors
/// Same as [`load_fb2`].
pub fn load_fb2_bytes(path: &Path, options: &LoadOptions) -> Result<Vec<u8>> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(Fb2Error::InvalidInput(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

    if is_zip {
        load_from_zip(path, options)
    } else {
        options.check_size(meta.len(), &path.display().to_string())?;
        Ok(fs::read(path)?)
    }
}

/// Extract the first `.fb2` entry from a ZIP archive
fn load_from_zip(path: &Path, options: &LoadOptions) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let is_fb2 = Path::new(entry.name())
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("fb2"));
        if !is_fb2 || entry.is_dir() {
            continue;
        }

        options.check_size(entry.size(), entry.name())?;
        log::debug!("reading {} from {}", entry.name(), path.display());

        let mut bytes = Vec::new();
        match options.max_size {
            // the declared size is not trusted, stop one byte past the limit
            Some(limit) => {
                (&mut entry).take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
                options.check_size(bytes.len() as u64, entry.name())?;
            }
            None => {
                entry.read_to_end(&mut bytes)?;
            }
        }
        return Ok(bytes);
    }

    Err(Fb2Error::MissingFile(format!(
        "no .fb2 entry in {}",
        path.display()
    )))
}

/// Decode FB2 bytes to text
///
/// A byte-order mark wins; otherwise the `encoding` pseudo-attribute of the
/// XML declaration is used; otherwise UTF-8. Undecodable bytes become
/// U+FFFD.
#[must_use]
pub fn decode_fb2_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }

    let encoding = match declared_encoding(bytes) {
        Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            log::warn!("unknown encoding {label:?} in XML declaration, decoding as UTF-8");
            UTF_8
        }),
        None => UTF_8,
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        log::warn!(
            "input is not valid {}, invalid sequences were replaced",
            encoding.name()
        );
    }
    text.into_owned()
}

/// Encoding label from `<?xml ... encoding="..."?>`, if declared.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(DECLARATION_SCAN_LIMIT)];
    let head = String::from_utf8_lossy(head);

    let decl = head.trim_start().strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();

    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let label = &value[..value.find(quote)?];

    Some(label.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            declared_encoding(br#"<?xml version="1.0" encoding="windows-1251"?><a/>"#).as_deref(),
            Some("windows-1251")
        );
        assert_eq!(
            declared_encoding(b"\n  <?xml version='1.0' encoding = 'UTF-8' ?><a/>").as_deref(),
            Some("UTF-8")
        );
        assert_eq!(declared_encoding(br#"<?xml version="1.0"?><a/>"#), None);
        assert_eq!(declared_encoding(b"<a encoding=\"koi8-r\"/>"), None);
    }

    #[test]
    fn test_decode_windows_1251() {
        // "Привет" in windows-1251
        let mut bytes = br#"<?xml version="1.0" encoding="windows-1251"?><p>"#.to_vec();
        bytes.extend_from_slice(&[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);
        bytes.extend_from_slice(b"</p>");

        let text = decode_fb2_bytes(&bytes);
        assert!(text.ends_with("<p>Привет</p>"));
    }

    #[test]
    fn test_bom_wins_over_declaration() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(r#"<?xml version="1.0" encoding="windows-1251"?><p>ü</p>"#.as_bytes());

        let text = decode_fb2_bytes(&bytes);
        assert!(text.starts_with("<?xml"));
        assert!(text.ends_with("<p>ü</p>"));
    }

    #[test]
    fn test_unknown_label_decodes_as_utf8() {
        let text = decode_fb2_bytes(r#"<?xml version="1.0" encoding="x-nonsense"?><p>é</p>"#.as_bytes());
        assert!(text.ends_with("<p>é</p>"));
    }

    #[test]
    fn test_size_limit() {
        let options = LoadOptions::with_max_size(10);
        assert!(options.check_size(10, "f").is_ok());
        assert!(matches!(
            options.check_size(11, "f"),
            Err(Fb2Error::InvalidInput(_))
        ));
        assert!(LoadOptions::default().check_size(u64::MAX, "f").is_ok());
    }
}
