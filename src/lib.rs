//! # zhmatch-rs
//!
//! Greedy longest-match dictionary substitution for Chinese text.
//!
//! One engine serves two jobs:
//! - **translation**: replace the longest dictionary phrase at each position
//!   of a line with its translation, copying unknown characters through;
//! - **recombination**: merge runs of segmented words that form a dictionary
//!   phrase back into one word.
//!
//! ## Quick Start
//!
//! ```rust
//! use zhmatch_rs::Translator;
//!
//! let translator = Translator::from_entries([("之", "的"), ("之乎者也", "that's it")]).unwrap();
//!
//! assert_eq!(translator.translate_line("之乎者也"), "that's it");
//! assert_eq!(translator.translate_line("学之道"), "学的道");
//! ```
//!
//! ## Recombining Tokens
//!
//! ```rust
//! use zhmatch_rs::PhraseCombiner;
//!
//! let combiner = PhraseCombiner::from_phrases([vec!["纽约", "时报"]]).unwrap();
//! assert_eq!(combiner.combine(&["读", "纽约", "时报"]), vec!["读", "纽约时报"]);
//! ```
//!
//! ## Generic Matching
//!
//! [`LongestMatchDictionary`] works over any hashable unit type and yields
//! [`Segment`]s lazily:
//!
//! ```rust
//! use zhmatch_rs::LongestMatchDictionary;
//!
//! let dict = LongestMatchDictionary::from_entries([(vec![1, 2], "a"), (vec![1, 2, 3], "b")]).unwrap();
//! let input = [1, 2, 3, 4];
//! let values: Vec<_> = dict.matches::<i32, _>(&input).map(|s| s.value().copied()).collect();
//! assert_eq!(values, vec![Some("b"), None]);
//! ```

pub mod combine;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod translate;
pub mod trie;

// Re-export main types for convenience
pub use combine::{CombinerBuilder, PhraseCombiner, PhraseSet};
pub use config::{Config, DictFormat};
pub use dictionary::LongestMatchDictionary;
pub use error::{ConfigurationError, LoadError};
pub use matcher::{Matches, Segment, SegmentKind, SegmentRecord};
pub use translate::{PhraseDictionary, Translation, Translator, TranslatorBuilder};
pub use trie::{Insertion, Lookup, Trie, TrieNode};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
