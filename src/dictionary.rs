//! The longest-match dictionary.
//!
//! Wraps the prefix [`Trie`] with the construction rules (non-empty keys,
//! first value wins) and the bounded longest-match scan used by both the
//! translation and the recombination front ends.

use std::borrow::Borrow;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::trace;

use crate::error::ConfigurationError;
use crate::matcher::Matches;
use crate::trie::{Insertion, Lookup, Trie};

/// A dictionary of keys made of atomic units `A`, each mapped to a value `V`.
///
/// Built once, then only read. Sharing it across threads needs no locking.
#[derive(Debug, Clone)]
pub struct LongestMatchDictionary<A, V> {
    index: Trie<A, V>,
}

impl<A, V> Default for LongestMatchDictionary<A, V> {
    fn default() -> Self {
        LongestMatchDictionary {
            index: Trie::default(),
        }
    }
}

impl<A: Hash + Eq, V> LongestMatchDictionary<A, V> {
    /// Create a new empty dictionary
    pub fn new() -> Self {
        LongestMatchDictionary::default()
    }

    /// Build from `(key, value)` pairs in the order given.
    ///
    /// Later duplicates of a key are dropped. Fails on the first empty key.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: IntoIterator<Item = A>,
    {
        let mut dict = LongestMatchDictionary::new();
        for (key, value) in entries {
            dict.insert(key, value)?;
        }
        Ok(dict)
    }

    /// Add an entry. Returns `Ok(false)` when the key was already present,
    /// in which case the stored value is left untouched.
    pub fn insert<K>(&mut self, key: K, value: V) -> Result<bool, ConfigurationError>
    where
        K: IntoIterator<Item = A>,
    {
        match self.index.insert(key, value) {
            Insertion::Added(_) => Ok(true),
            Insertion::Duplicate => {
                trace!("duplicate dictionary key ignored");
                Ok(false)
            }
            Insertion::Empty => Err(ConfigurationError::EmptyKey),
        }
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Length in units of the longest key; bounds every lookahead scan
    pub fn max_key_len(&self) -> usize {
        self.index.max_key_len()
    }

    /// Get a reference to the prefix index
    pub fn index(&self) -> &Trie<A, V> {
        &self.index
    }

    pub fn lookup<Q, K>(&self, key: &[K]) -> Lookup<'_, V>
    where
        A: Borrow<Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.lookup::<Q, K>(key)
    }

    /// Value of a complete key
    pub fn get<Q, K>(&self, key: &[K]) -> Option<&V>
    where
        A: Borrow<Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.lookup::<Q, K>(key).value()
    }

    /// Find the longest key starting at `position`.
    ///
    /// Returns the offset just past the match and the key's value. The scan
    /// keeps going through prefix-only nodes and stops at the first unit that
    /// leaves the index, at the end of the input, or after `max_key_len`
    /// units.
    pub fn longest_match_at<Q, T>(&self, input: &[T], position: usize) -> Option<(usize, &V)>
    where
        A: Borrow<Q>,
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let limit = input
            .len()
            .min(position.saturating_add(self.index.max_key_len()));
        let mut node = None;
        let mut best = None;
        let mut i = position;

        while i < limit {
            match self.index.walk(<T as Borrow<Q>>::borrow(&input[i]), node) {
                Some(next) => {
                    if let Some(value) = next.value() {
                        best = Some((i + 1, value));
                    }
                    node = Some(next);
                    i += 1;
                }
                None => break,
            }
        }

        best
    }

    /// Lazily segment `input` into matched and literal spans.
    ///
    /// `Q` is the borrowed form units are compared as, e.g. `char` for
    /// character keys or `str` for word keys.
    pub fn matches<'a, Q, T>(&'a self, input: &'a [T]) -> Matches<'a, A, V, Q, T>
    where
        A: Borrow<Q>,
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Matches {
            dict: self,
            input,
            position: 0,
            _unit: PhantomData,
        }
    }
}
