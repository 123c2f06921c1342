//! Runtime configuration for the `zhmatch` tool.
//!
//! A JSON file may set any subset of the fields; missing fields take the
//! defaults below. Command-line flags are applied on top by the binary.
//!
//! ```rust
//! use zhmatch_rs::{Config, DictFormat};
//!
//! let config = Config::from_json_str(r#"{ "encoding": "gbk", "format": "pairs" }"#).unwrap();
//! assert_eq!(config.encoding(), "gbk");
//! assert_eq!(config.format, Some(DictFormat::Pairs));
//! assert_eq!(config.joiner, "");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Lines below this count are processed sequentially
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 500;

/// Encoding of dictionary files when none is configured
pub const DEFAULT_ENCODING: &str = "utf-8";

/// WWStar installations ship their data files in GBK
pub const WWSTAR_ENCODING: &str = "gbk";

/// Layout of a dictionary file
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DictFormat {
    /// `phrase<TAB>translation` per line
    Tsv,
    /// Key line followed by value line
    Pairs,
    /// One phrase per line, words separated by whitespace
    Phrases,
}

impl DictFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DictFormat::Tsv => "tsv",
            DictFormat::Pairs => "pairs",
            DictFormat::Phrases => "phrases",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Encoding label of dictionary files; unset means the source's default
    pub encoding: Option<String>,
    /// Dictionary layout; each subcommand has its own default
    pub format: Option<DictFormat>,
    /// Dictionary files, loaded in this order
    pub dictionaries: Vec<PathBuf>,
    /// WWStar installation directory (translation only)
    pub wwstar: Option<PathBuf>,
    /// Placed between the words of a recombined phrase
    pub joiner: String,
    /// NFC-normalize dictionary keys and input
    pub normalize: bool,
    pub parallel_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            encoding: None,
            format: None,
            dictionaries: Vec::new(),
            wwstar: None,
            joiner: String::new(),
            normalize: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let malformed = |reason: String| LoadError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let config = Self::from_json_str(&text).map_err(|e| malformed(e.to_string()))?;
        if config.wwstar.is_some() && !config.dictionaries.is_empty() {
            return Err(malformed(
                "'wwstar' and 'dictionaries' cannot be used together".to_string(),
            ));
        }
        Ok(config)
    }

    /// Encoding for dictionary files
    pub fn encoding(&self) -> &str {
        self.encoding.as_deref().unwrap_or(DEFAULT_ENCODING)
    }

    /// Encoding for a WWStar directory, GBK unless set explicitly
    pub fn wwstar_encoding(&self) -> &str {
        self.encoding.as_deref().unwrap_or(WWSTAR_ENCODING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.encoding(), DEFAULT_ENCODING);
        assert_eq!(config.wwstar_encoding(), WWSTAR_ENCODING);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert!(config.format.is_none());
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "encoding": "gbk",
            "format": "phrases",
            "dictionaries": ["a.txt", "b.txt"],
            "joiner": "_",
            "normalize": true,
            "parallel_threshold": 10
        }"#;
        let config = Config::from_json_str(json).unwrap();

        assert_eq!(config.format, Some(DictFormat::Phrases));
        assert_eq!(config.dictionaries.len(), 2);
        assert_eq!(config.joiner, "_");
        assert!(config.normalize);
        assert_eq!(config.parallel_threshold, 10);
    }

    #[test]
    fn test_explicit_encoding_applies_to_wwstar() {
        let config = Config::from_json_str(r#"{ "encoding": "big5" }"#).unwrap();
        assert_eq!(config.encoding(), "big5");
        assert_eq!(config.wwstar_encoding(), "big5");
    }

    #[test]
    fn test_wwstar_with_dictionaries_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zhmatch.json");
        fs::write(&path, r#"{ "wwstar": "/opt/wwstar", "dictionaries": ["a.tsv"] }"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert!(err.to_string().contains("wwstar"));

        fs::write(&path, r#"{ "wwstar": "/opt/wwstar" }"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.wwstar, Some(PathBuf::from("/opt/wwstar")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Config::from_json_str(r#"{ "encodng": "gbk" }"#).is_err());
    }

    #[test]
    fn test_format_names() {
        for format in [DictFormat::Tsv, DictFormat::Pairs, DictFormat::Phrases] {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.as_str()));
        }
    }
}
