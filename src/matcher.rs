//! Greedy longest-match segmentation.
//!
//! [`Matches`] walks an input sequence once, left to right. At each position
//! it takes the longest dictionary key starting there; if none does, the
//! single unit at that position is emitted as a literal. The segments cover
//! the input exactly, in order, without overlap.

use std::borrow::Borrow;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::dictionary::LongestMatchDictionary;

/// What a segment was produced from
#[derive(Debug, PartialEq, Eq)]
pub enum SegmentKind<'a, V> {
    /// A dictionary key, with its value
    Matched(&'a V),
    /// A single unit no key starts with
    Literal,
}

impl<V> Clone for SegmentKind<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for SegmentKind<'_, V> {}

/// A span `start..end` of the input, in atomic units
#[derive(Debug, PartialEq, Eq)]
pub struct Segment<'a, V> {
    pub start: usize,
    pub end: usize,
    pub kind: SegmentKind<'a, V>,
}

impl<V> Clone for Segment<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Segment<'_, V> {}

impl<'a, V> Segment<'a, V> {
    /// Number of units covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_match(&self) -> bool {
        matches!(self.kind, SegmentKind::Matched(_))
    }

    pub fn value(&self) -> Option<&'a V> {
        match self.kind {
            SegmentKind::Matched(v) => Some(v),
            SegmentKind::Literal => None,
        }
    }

    /// The covered units of `input`
    pub fn span<'s, T>(&self, input: &'s [T]) -> &'s [T] {
        &input[self.start..self.end]
    }
}

/// Lazy iterator over the segments of one input sequence.
///
/// Created by [`LongestMatchDictionary::matches`]. Holds no state beyond the
/// current position; the dictionary is only read.
pub struct Matches<'a, A, V, Q: ?Sized, T> {
    pub(crate) dict: &'a LongestMatchDictionary<A, V>,
    pub(crate) input: &'a [T],
    pub(crate) position: usize,
    pub(crate) _unit: PhantomData<fn(&Q)>,
}

impl<'a, A, V, Q, T> Iterator for Matches<'a, A, V, Q, T>
where
    A: Hash + Eq + Borrow<Q>,
    T: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    type Item = Segment<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.input.len() {
            return None;
        }

        let dict = self.dict;
        let start = self.position;
        let segment = match dict.longest_match_at::<Q, T>(self.input, start) {
            Some((end, value)) => Segment {
                start,
                end,
                kind: SegmentKind::Matched(value),
            },
            None => Segment {
                start,
                end: start + 1,
                kind: SegmentKind::Literal,
            },
        };

        self.position = segment.end;
        Some(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.input.len().saturating_sub(self.position);
        (remaining.min(1), Some(remaining))
    }
}

impl<'a, A, V, Q, T> FusedIterator for Matches<'a, A, V, Q, T>
where
    A: Hash + Eq + Borrow<Q>,
    T: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
}

/// Owned, serializable view of one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Input text covered by the segment
    pub source: String,
    /// What the segment is rendered as
    pub output: String,
    /// First unit covered
    pub start: usize,
    /// One past the last unit covered
    pub end: usize,
    /// Whether a dictionary key produced the segment
    pub matched: bool,
}
