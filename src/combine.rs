//! Recombination of segmented words into dictionary phrases.
//!
//! Keys are word sequences and only their presence matters. A match is
//! rendered as its own words joined by the combiner's joiner (empty by
//! default, which suits Chinese); unmatched words pass through.

use std::borrow::Borrow;
use std::sync::Arc;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::dictionary::LongestMatchDictionary;
use crate::error::ConfigurationError;
use crate::matcher::{Segment, SegmentRecord};

/// Dictionary type used for recombination
pub type PhraseSet = LongestMatchDictionary<String, ()>;

/// Merges runs of tokens that form a dictionary phrase
#[derive(Debug, Clone)]
pub struct PhraseCombiner {
    dict: Arc<PhraseSet>,
    joiner: String,
    normalize: bool,
}

impl PhraseCombiner {
    /// Create a combiner that owns the phrase set
    pub fn new(dict: PhraseSet) -> Self {
        Self::with_arc(Arc::new(dict))
    }

    /// Create a combiner with a shared phrase set
    pub fn with_arc(dict: Arc<PhraseSet>) -> Self {
        PhraseCombiner {
            dict,
            joiner: String::new(),
            normalize: false,
        }
    }

    /// Build from phrases given as word sequences
    pub fn from_phrases<I, P, W>(phrases: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let mut builder = CombinerBuilder::new();
        for phrase in phrases {
            builder.add(phrase)?;
        }
        Ok(builder.build())
    }

    /// String placed between the words of a combined phrase
    pub fn with_joiner(mut self, joiner: impl Into<String>) -> Self {
        self.joiner = joiner.into();
        self
    }

    pub fn joiner(&self) -> &str {
        &self.joiner
    }

    pub fn dictionary(&self) -> &PhraseSet {
        &self.dict
    }

    pub fn dictionary_arc(&self) -> Arc<PhraseSet> {
        Arc::clone(&self.dict)
    }

    fn render<S: Borrow<str>>(&self, segment: &Segment<'_, ()>, tokens: &[S]) -> String {
        let words: Vec<&str> = segment
            .span(tokens)
            .iter()
            .map(<S as Borrow<str>>::borrow)
            .collect();
        words.join(self.joiner.as_str())
    }

    fn normalized<S: Borrow<str>>(tokens: &[S]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| <S as Borrow<str>>::borrow(t).nfc().collect())
            .collect()
    }

    /// Combine a token list; the result covers every input token exactly once
    pub fn combine<S: Borrow<str>>(&self, tokens: &[S]) -> Vec<String> {
        if self.normalize {
            let tokens = Self::normalized(tokens);
            return self.combine_tokens(&tokens);
        }
        self.combine_tokens(tokens)
    }

    fn combine_tokens<S: Borrow<str>>(&self, tokens: &[S]) -> Vec<String> {
        self.dict
            .matches::<str, _>(tokens)
            .map(|seg| self.render(&seg, tokens))
            .collect()
    }

    /// Split a line on whitespace, combine, and join the result with spaces
    pub fn combine_line(&self, line: &str) -> String {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        self.combine(&tokens).join(" ")
    }

    /// Combine keeping the source span of every output word
    pub fn segments<S: Borrow<str>>(&self, tokens: &[S]) -> Vec<SegmentRecord> {
        let owned;
        let tokens: Vec<&str> = if self.normalize {
            owned = Self::normalized(tokens);
            owned.iter().map(String::as_str).collect()
        } else {
            tokens.iter().map(<S as Borrow<str>>::borrow).collect()
        };

        self.dict
            .matches::<str, _>(&tokens)
            .map(|seg| SegmentRecord {
                source: seg.span(&tokens).join(" "),
                output: self.render(&seg, &tokens),
                start: seg.start,
                end: seg.end,
                matched: seg.is_match(),
            })
            .collect()
    }
}

/// Builder for a [`PhraseCombiner`]
#[derive(Debug, Default)]
pub struct CombinerBuilder {
    dict: PhraseSet,
    joiner: String,
    normalize: bool,
}

impl CombinerBuilder {
    pub fn new() -> Self {
        CombinerBuilder::default()
    }

    pub fn joiner(mut self, joiner: impl Into<String>) -> Self {
        self.joiner = joiner.into();
        self
    }

    /// NFC-normalize phrase words now and tokens at combination time.
    ///
    /// Must be set before phrases are added.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Add one phrase given as its words
    pub fn add<P, W>(&mut self, phrase: P) -> Result<bool, ConfigurationError>
    where
        P: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let normalize = self.normalize;
        let words = phrase.into_iter().map(|w| {
            if normalize {
                w.as_ref().nfc().collect::<String>()
            } else {
                w.as_ref().to_string()
            }
        });
        self.dict.insert(words, ())
    }

    pub fn build(self) -> PhraseCombiner {
        debug!(
            phrases = self.dict.len(),
            max_words = self.dict.max_key_len(),
            "built phrase set"
        );
        PhraseCombiner {
            dict: Arc::new(self.dict),
            joiner: self.joiner,
            normalize: self.normalize,
        }
    }
}
