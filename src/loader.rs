//! Dictionary sources.
//!
//! Parsers turn decoded text into ordered `(key, value)` pairs or word
//! lists; the order they return is the order entries are inserted, so the
//! first occurrence of a key is the one that sticks.
//!
//! Supported layouts:
//! - TSV: `phrase<TAB>translation`, `#` comments
//! - line pairs: a key line followed by its value line (WWStar data files)
//! - phrase lists: one phrase per line, words separated by whitespace
//! - a WWStar installation directory (`Script/VERSION.DAT` plus data files)

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::DictFormat;
use crate::error::{ConfigurationError, LoadError};

/// Trailing digit of a WWStar data file name: the key length it holds
static DATA_FILE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)$").unwrap());

/// Decode `bytes` with the encoding named by a WHATWG label (`utf-8`, `gbk`, ...).
///
/// A byte order mark overrides the label. Malformed sequences become U+FFFD.
pub fn decode_bytes(bytes: &[u8], label: &str) -> Result<String, LoadError> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| LoadError::UnknownEncoding(label.to_string()))?;

    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            encoding = actual.name(),
            "malformed byte sequences replaced while decoding"
        );
    }
    Ok(text.into_owned())
}

/// Read a file and decode it
pub fn read_text(path: &Path, label: &str) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    decode_bytes(&bytes, label)
}

/// Parse alternating key and value lines.
///
/// Both lines are trimmed. A key without a value line ends the input. With
/// `required_len`, keys whose length in characters differs are skipped.
pub fn parse_line_pairs(
    text: &str,
    required_len: Option<usize>,
) -> Result<Vec<(String, String)>, LoadError> {
    let mut entries = Vec::new();
    let mut lines = text.lines().enumerate();

    while let (Some((idx, key)), Some((_, value))) = (lines.next(), lines.next()) {
        let key = key.trim();
        match required_len {
            Some(n) => {
                if key.is_empty() || key.chars().count() != n {
                    continue;
                }
            }
            None => {
                if key.is_empty() {
                    return Err(LoadError::Configuration {
                        line: idx + 1,
                        source: ConfigurationError::EmptyKey,
                    });
                }
            }
        }
        entries.push((key.to_string(), value.trim().to_string()));
    }

    Ok(entries)
}

/// Parse `phrase<TAB>translation` lines
pub fn parse_tsv(text: &str) -> Result<Vec<(String, String)>, LoadError> {
    let mut entries = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        // Skip comments and empty lines
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('\t') else {
            warn!(line = idx + 1, "no tab separator, line skipped");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(LoadError::Configuration {
                line: idx + 1,
                source: ConfigurationError::EmptyKey,
            });
        }
        entries.push((key.to_string(), value.trim().to_string()));
    }

    Ok(entries)
}

/// Parse a phrase list: one phrase per line, words split on whitespace
pub fn parse_phrase_list(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(|line| {
            line.split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|words| !words.is_empty())
        .collect()
}

/// Load translation pairs from a file in the given layout
pub fn load_pairs(
    path: &Path,
    format: DictFormat,
    label: &str,
) -> Result<Vec<(String, String)>, LoadError> {
    let text = read_text(path, label)?;
    let entries = match format {
        DictFormat::Tsv => parse_tsv(&text),
        DictFormat::Pairs => parse_line_pairs(&text, None),
        DictFormat::Phrases => Err(LoadError::Malformed {
            path: path.to_path_buf(),
            reason: "phrase lists carry no translations".to_string(),
        }),
    }
    .map_err(|e| with_path(e, path))?;

    debug!(path = %path.display(), entries = entries.len(), "loaded dictionary file");
    Ok(entries)
}

/// Load a phrase list file
pub fn load_phrases(path: &Path, label: &str) -> Result<Vec<Vec<String>>, LoadError> {
    let phrases = parse_phrase_list(&read_text(path, label)?);
    debug!(path = %path.display(), phrases = phrases.len(), "loaded phrase list");
    Ok(phrases)
}

fn with_path(err: LoadError, path: &Path) -> LoadError {
    match err {
        LoadError::Configuration { line, source } => LoadError::Malformed {
            path: path.to_path_buf(),
            reason: format!("line {}: {}", line, source),
        },
        other => other,
    }
}

/// Contents of a WWStar installation
#[derive(Debug, Clone, Default)]
pub struct WwstarData {
    /// Lines of `VERSION.DAT`
    pub version: Vec<String>,
    /// Data files in load order, with the key length each holds
    pub files: Vec<(PathBuf, usize)>,
    /// All entries, in load order
    pub entries: Vec<(String, String)>,
}

/// Load a WWStar installation rooted at `root`.
///
/// Line 5 of `Script/VERSION.DAT` names the data file prefix. Data files are
/// the `Script/` entries starting with that prefix (ignoring case) and ending
/// in a digit, which is the length of the keys the file may contribute. Files
/// load in name order.
pub fn load_wwstar_dir(root: &Path, label: &str) -> Result<WwstarData, LoadError> {
    let script = root.join("Script");
    let version_path = script.join("VERSION.DAT");
    let version: Vec<String> = read_text(&version_path, label)?
        .lines()
        .map(str::to_string)
        .collect();

    let prefix = version
        .get(4)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LoadError::Malformed {
            path: version_path.clone(),
            reason: "line 5 must name the data file prefix".to_string(),
        })?;

    let files = list_data_files(&script, &prefix)?;
    let mut entries = Vec::new();
    for (path, key_len) in &files {
        let text = read_text(path, label)?;
        let pairs = parse_line_pairs(&text, Some(*key_len))?;
        debug!(path = %path.display(), key_len, entries = pairs.len(), "loaded data file");
        entries.extend(pairs);
    }

    if files.is_empty() {
        warn!(dir = %script.display(), prefix = %prefix, "no data files found");
    }

    Ok(WwstarData {
        version,
        files,
        entries,
    })
}

fn list_data_files(dir: &Path, prefix: &str) -> Result<Vec<(PathBuf, usize)>, LoadError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))? {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let files = names
        .into_iter()
        .filter(|name| name.to_lowercase().starts_with(prefix))
        .filter_map(|name| {
            let key_len = DATA_FILE_SUFFIX
                .captures(&name)
                .and_then(|caps| caps[1].parse::<usize>().ok())?;
            Some((dir.join(&name), key_len))
        })
        .collect();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_pairs() {
        let text = "之\n的\n之乎者也\nthat's it\n";
        let entries = parse_line_pairs(text, None).unwrap();
        assert_eq!(
            entries,
            vec![
                ("之".to_string(), "的".to_string()),
                ("之乎者也".to_string(), "that's it".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_line_pairs_length_filter() {
        let text = "  之 \n的\n之乎\n这个\n也\n呀\n";
        let entries = parse_line_pairs(text, Some(1)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "之");
        assert_eq!(entries[1], ("也".to_string(), "呀".to_string()));
    }

    #[test]
    fn test_parse_line_pairs_dangling_key() {
        let entries = parse_line_pairs("之\n的\n乎", None).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_parse_line_pairs_empty_key() {
        let err = parse_line_pairs("之\n的\n\n空\n", None).unwrap_err();
        assert!(matches!(err, LoadError::Configuration { line: 3, .. }));

        // A length filter never admits an empty key
        assert_eq!(parse_line_pairs("\n空\n", Some(1)).unwrap().len(), 0);
    }

    #[test]
    fn test_parse_tsv() {
        let tsv = "# comment\n之\t的\n\nbroken line\n不亦\t不也 \n";
        let entries = parse_tsv(tsv).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], ("不亦".to_string(), "不也".to_string()));
    }

    #[test]
    fn test_parse_tsv_empty_key() {
        let err = parse_tsv("之\t的\n\t空").unwrap_err();
        assert!(matches!(err, LoadError::Configuration { line: 2, .. }));
    }

    #[test]
    fn test_parse_phrase_list() {
        let phrases = parse_phrase_list("纽约 时报\n\n  中华人民共和国 \n");
        assert_eq!(
            phrases,
            vec![
                vec!["纽约".to_string(), "时报".to_string()],
                vec!["中华人民共和国".to_string()],
            ]
        );
    }

    #[test]
    fn test_decode_gbk() {
        let (bytes, _, _) = encoding_rs::GBK.encode("之乎者也");
        assert_eq!(decode_bytes(&bytes, "gbk").unwrap(), "之乎者也");
        assert_eq!(decode_bytes("之".as_bytes(), "utf-8").unwrap(), "之");
    }

    #[test]
    fn test_decode_unknown_label() {
        let err = decode_bytes(b"abc", "klingon").unwrap_err();
        assert!(matches!(err, LoadError::UnknownEncoding(_)));
    }

    #[test]
    fn test_data_file_suffix() {
        let caps = DATA_FILE_SUFFIX.captures("WWS.DA4").unwrap();
        assert_eq!(&caps[1], "4");
        assert!(DATA_FILE_SUFFIX.captures("WWS.RT").is_none());
    }
}
