//! Configuration file support
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (`--pretty`, `--max-size`)
//! 2. File given with `--config`, else `./.readermarket.toml`
//! 3. Built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".readermarket.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Loader settings
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Maximum input size, e.g. "50M" or "1048576"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<String>,
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Explicit config if given, else the project config if it exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let project = Path::new(PROJECT_CONFIG_FILE);
        if project.is_file() {
            log::debug!("using project config {}", project.display());
            return Self::load_from_file(project);
        }

        Ok(Self::default())
    }

    /// Configured size limit in bytes.
    pub fn max_size(&self) -> Result<Option<u64>> {
        self.loader
            .max_size
            .as_deref()
            .map(|s| parse_file_size(s).map_err(|e| anyhow::anyhow!("loader.max_size: {e}")))
            .transpose()
    }
}

/// Size suffixes, longest first so "MB" is tried before "B".
const SIZE_UNITS: [(&str, u64); 7] = [
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
    ("G", 1 << 30),
    ("M", 1 << 20),
    ("K", 1 << 10),
    ("B", 1),
];

/// Parse a byte count such as "1024", "10K", "1.5M" or "2GB"
///
/// Suffixes are binary (1K = 1024) and case-insensitive.
pub fn parse_file_size(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    let upper = trimmed.to_ascii_uppercase();

    let (digits, unit) = SIZE_UNITS
        .iter()
        .find_map(|&(suffix, unit)| {
            upper
                .strip_suffix(suffix)
                .map(|rest| (&trimmed[..rest.len()], unit))
        })
        .unwrap_or((trimmed, 1));

    let digits = digits.trim();
    if digits.is_empty() {
        return Err(format!("missing number in size '{trimmed}'"));
    }

    let value: f64 = digits
        .parse()
        .map_err(|_| format!("invalid number '{digits}' in size '{trimmed}'"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("size must be a non-negative number: '{trimmed}'"));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let bytes = (value * unit as f64).round() as u64;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_size() {
        assert_eq!(parse_file_size("1024"), Ok(1024));
        assert_eq!(parse_file_size("10K"), Ok(10 * 1024));
        assert_eq!(parse_file_size("1.5M"), Ok(1_572_864));
        assert_eq!(parse_file_size("2gb"), Ok(2 * 1024 * 1024 * 1024));
        assert_eq!(parse_file_size(" 7B "), Ok(7));
        assert!(parse_file_size("").is_err());
        assert!(parse_file_size("M").is_err());
        assert!(parse_file_size("-1K").is_err());
        assert!(parse_file_size("ten").is_err());
        assert!(parse_file_size("1XB").is_err());
        assert_eq!(parse_file_size("3 kb"), Ok(3 * 1024));
    }

    #[test]
    fn test_config_from_toml() {
        let config: Config = toml::from_str(
            r#"
[output]
pretty = true

[loader]
max_size = "50M"
"#,
        )
        .unwrap();

        assert!(config.output.pretty);
        assert_eq!(config.max_size().unwrap(), Some(50 * 1024 * 1024));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_size().unwrap(), None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("[output]\ncolour = true\n").is_err());
    }

    #[test]
    fn test_bad_max_size_is_reported() {
        let config = Config {
            loader: LoaderConfig {
                max_size: Some("lots".to_string()),
            },
            ..Config::default()
        };
        let err = config.max_size().unwrap_err();
        assert!(err.to_string().contains("loader.max_size"));
    }
}
