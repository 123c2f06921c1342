//! Character-level phrase translation.
//!
//! Keys are character sequences, values are replacement strings. Each
//! longest match is replaced by its value; characters no key starts with are
//! copied through unchanged.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::dictionary::LongestMatchDictionary;
use crate::error::ConfigurationError;
use crate::matcher::SegmentRecord;

/// Dictionary type used for translation
pub type PhraseDictionary = LongestMatchDictionary<char, String>;

/// Translates text with a phrase dictionary
#[derive(Debug, Clone)]
pub struct Translator {
    dict: Arc<PhraseDictionary>,
    normalize: bool,
}

impl Translator {
    /// Create a translator that owns the dictionary
    pub fn new(dict: PhraseDictionary) -> Self {
        Translator {
            dict: Arc::new(dict),
            normalize: false,
        }
    }

    /// Create a translator with a shared dictionary reference
    pub fn with_arc(dict: Arc<PhraseDictionary>) -> Self {
        Translator {
            dict,
            normalize: false,
        }
    }

    /// Build directly from `(phrase, translation)` pairs, without normalization
    pub fn from_entries<I, K, S>(entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: Into<String>,
    {
        let mut builder = TranslatorBuilder::new();
        for (key, value) in entries {
            builder.add(key.as_ref(), value)?;
        }
        Ok(builder.build())
    }

    /// Get a reference to the dictionary
    pub fn dictionary(&self) -> &PhraseDictionary {
        &self.dict
    }

    /// Get the Arc reference to the dictionary (for sharing)
    pub fn dictionary_arc(&self) -> Arc<PhraseDictionary> {
        Arc::clone(&self.dict)
    }

    /// Whether input is NFC-normalized before matching
    pub fn normalizes(&self) -> bool {
        self.normalize
    }

    fn units(&self, text: &str) -> Vec<char> {
        if self.normalize {
            text.nfc().collect()
        } else {
            text.chars().collect()
        }
    }

    /// Lazily translate `text`, one output piece per segment
    pub fn translate(&self, text: &str) -> Translation<'_> {
        Translation {
            dict: &self.dict,
            chars: self.units(text),
            position: 0,
        }
    }

    /// Translate `text` and concatenate the pieces
    pub fn translate_line(&self, text: &str) -> String {
        self.translate(text).collect()
    }

    /// Translate `text` keeping the source of every piece
    pub fn segments(&self, text: &str) -> Vec<SegmentRecord> {
        let chars = self.units(text);
        self.dict
            .matches::<char, _>(&chars)
            .map(|seg| {
                let source: String = seg.span(&chars).iter().collect();
                let output = match seg.value() {
                    Some(v) => v.clone(),
                    None => source.clone(),
                };
                SegmentRecord {
                    source,
                    output,
                    start: seg.start,
                    end: seg.end,
                    matched: seg.is_match(),
                }
            })
            .collect()
    }
}

/// Iterator returned by [`Translator::translate`]
pub struct Translation<'a> {
    dict: &'a PhraseDictionary,
    chars: Vec<char>,
    position: usize,
}

impl<'a> Iterator for Translation<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        let dict = self.dict;
        let ch = *self.chars.get(self.position)?;
        match dict.longest_match_at::<char, _>(&self.chars, self.position) {
            Some((end, value)) => {
                self.position = end;
                Some(Cow::Borrowed(value.as_str()))
            }
            None => {
                self.position += 1;
                Some(Cow::Owned(ch.to_string()))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chars.len().saturating_sub(self.position);
        (remaining.min(1), Some(remaining))
    }
}

/// Builder for a [`Translator`]
#[derive(Debug, Default)]
pub struct TranslatorBuilder {
    dict: PhraseDictionary,
    normalize: bool,
    skipped: usize,
}

impl TranslatorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        TranslatorBuilder::default()
    }

    /// NFC-normalize keys now and input at translation time.
    ///
    /// Must be set before entries are added.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Add one phrase. Returns `Ok(false)` if the phrase was already present.
    pub fn add(
        &mut self,
        phrase: &str,
        translation: impl Into<String>,
    ) -> Result<bool, ConfigurationError> {
        let added = if self.normalize {
            self.dict.insert(phrase.nfc(), translation.into())?
        } else {
            self.dict.insert(phrase.chars(), translation.into())?
        };
        if !added {
            self.skipped += 1;
        }
        Ok(added)
    }

    /// Add pairs in order; stops at the first empty phrase
    pub fn add_entries<I, K, S>(&mut self, entries: I) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: Into<String>,
    {
        for (key, value) in entries {
            self.add(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Build and return the Translator
    pub fn build(self) -> Translator {
        debug!(
            phrases = self.dict.len(),
            duplicates = self.skipped,
            max_len = self.dict.max_key_len(),
            "built phrase dictionary"
        );
        Translator {
            dict: Arc::new(self.dict),
            normalize: self.normalize,
        }
    }
}
