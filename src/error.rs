//! Error types for dictionary construction and loading.
//!
//! Matching itself never fails: input that no key covers is passed through
//! unit by unit. The only faults are a zero-length key at build time and
//! whatever goes wrong while reading dictionary sources.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Rejected dictionary entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A key with no atomic units can never be matched
    EmptyKey,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyKey => write!(f, "dictionary key must not be empty"),
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Errors that can occur when reading dictionary sources
#[derive(Debug)]
pub enum LoadError {
    /// IO error on a specific path
    Io { path: PathBuf, source: io::Error },
    /// Encoding label not known to encoding_rs
    UnknownEncoding(String),
    /// Source exists but does not have the expected layout
    Malformed { path: PathBuf, reason: String },
    /// An entry was rejected by the dictionary
    Configuration {
        line: usize,
        source: ConfigurationError,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "IO error on '{}': {}", path.display(), source)
            }
            LoadError::UnknownEncoding(label) => write!(f, "Unknown encoding: {}", label),
            LoadError::Malformed { path, reason } => {
                write!(f, "Malformed file '{}': {}", path.display(), reason)
            }
            LoadError::Configuration { line, source } => {
                write!(f, "Invalid entry at line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Configuration { source, .. } => Some(source),
            _ => None,
        }
    }
}
