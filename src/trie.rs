//! Prefix index over sequences of atomic units.
//!
//! Every prefix of every key is a node. A node carrying a value is a complete
//! key; a node without one is only a continuation point. Lookups therefore
//! have three outcomes, see [`Lookup`].

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Result of looking up a sequence in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a, V> {
    /// No key starts with this sequence
    NotAPrefix,
    /// Some longer key starts with this sequence, but it is not a key itself
    PrefixOnly,
    /// The sequence is a complete key
    Complete(&'a V),
}

impl<'a, V> Lookup<'a, V> {
    /// Whether scanning may continue past this sequence
    pub fn is_prefix(&self) -> bool {
        !matches!(self, Lookup::NotAPrefix)
    }

    /// The value if this is a complete key
    pub fn value(&self) -> Option<&'a V> {
        match *self {
            Lookup::Complete(v) => Some(v),
            _ => None,
        }
    }
}

/// Outcome of inserting a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// New key with the given length in units
    Added(usize),
    /// Key already present; the earlier value is kept
    Duplicate,
    /// Zero-length key, nothing was stored
    Empty,
}

/// A node in the Trie
#[derive(Debug, Clone)]
pub struct TrieNode<A, V> {
    children: HashMap<A, TrieNode<A, V>>,
    value: Option<V>,
}

impl<A, V> Default for TrieNode<A, V> {
    fn default() -> Self {
        TrieNode {
            children: HashMap::new(),
            value: None,
        }
    }
}

impl<A: Hash + Eq, V> TrieNode<A, V> {
    /// Check if this node has any children
    pub fn can_walk(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this node ends a complete key
    pub fn is_match(&self) -> bool {
        self.value.is_some()
    }

    /// Value stored for the key ending here
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    fn child<Q>(&self, atom: &Q) -> Option<&TrieNode<A, V>>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.children.get(atom)
    }
}

/// A trie keyed by atomic units (characters, words, ...)
#[derive(Debug, Clone)]
pub struct Trie<A, V> {
    root: TrieNode<A, V>,
    key_count: usize,
    max_key_len: usize,
}

impl<A, V> Default for Trie<A, V> {
    fn default() -> Self {
        Trie {
            root: TrieNode::default(),
            key_count: 0,
            max_key_len: 0,
        }
    }
}

impl<A: Hash + Eq, V> Trie<A, V> {
    /// Create a new empty Trie
    pub fn new() -> Self {
        Trie::default()
    }

    /// Number of complete keys
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Length in units of the longest key, 0 when empty
    pub fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    /// Insert a key. The first value stored for a key is permanent.
    pub fn insert<I>(&mut self, key: I, value: V) -> Insertion
    where
        I: IntoIterator<Item = A>,
    {
        let mut current = &mut self.root;
        let mut len = 0;

        for atom in key {
            current = current.children.entry(atom).or_default();
            len += 1;
        }

        if len == 0 {
            return Insertion::Empty;
        }
        if current.value.is_some() {
            return Insertion::Duplicate;
        }

        current.value = Some(value);
        self.key_count += 1;
        self.max_key_len = self.max_key_len.max(len);
        Insertion::Added(len)
    }

    /// Walk the trie by one unit, starting from the root when `current` is None
    pub fn walk<'a, Q>(
        &'a self,
        atom: &Q,
        current: Option<&'a TrieNode<A, V>>,
    ) -> Option<&'a TrieNode<A, V>>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        current.unwrap_or(&self.root).child(atom)
    }

    /// Three-valued lookup of a full sequence
    pub fn lookup<Q, K>(&self, key: &[K]) -> Lookup<'_, V>
    where
        A: Borrow<Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if key.is_empty() {
            return Lookup::NotAPrefix;
        }

        let mut current = &self.root;
        for atom in key {
            match current.child(<K as Borrow<Q>>::borrow(atom)) {
                Some(node) => current = node,
                None => return Lookup::NotAPrefix,
            }
        }

        match current.value() {
            Some(v) => Lookup::Complete(v),
            None => Lookup::PrefixOnly,
        }
    }

    /// Get a reference to the root node (for external traversal)
    pub fn root(&self) -> &TrieNode<A, V> {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_trie_add_and_lookup() {
        let mut trie = Trie::new();

        trie.insert("之乎者也".chars(), "that's it");
        trie.insert("之".chars(), "的");

        assert_eq!(trie.lookup::<char, _>(&chars("之")), Lookup::Complete(&"的"));
        assert_eq!(trie.lookup::<char, _>(&chars("之乎")), Lookup::PrefixOnly);
        assert_eq!(trie.lookup::<char, _>(&chars("之乎者")), Lookup::PrefixOnly);
        assert_eq!(
            trie.lookup::<char, _>(&chars("之乎者也")),
            Lookup::Complete(&"that's it")
        );
        assert_eq!(trie.lookup::<char, _>(&chars("乎")), Lookup::NotAPrefix);
        assert_eq!(trie.lookup::<char, _>(&chars("之乎者也矣")), Lookup::NotAPrefix);
        assert_eq!(trie.lookup::<char, char>(&[]), Lookup::NotAPrefix);
    }

    #[test]
    fn test_trie_walk() {
        let mut trie = Trie::new();
        trie.insert(["纽约".to_string(), "时报".to_string()], ());

        let node1 = trie.walk("纽约", None);
        assert!(node1.is_some());
        assert!(!node1.unwrap().is_match());
        assert!(node1.unwrap().can_walk());

        let node2 = trie.walk("时报", node1);
        assert!(node2.is_some());
        assert!(node2.unwrap().is_match());
        assert!(!node2.unwrap().can_walk());

        assert!(trie.walk("时报", None).is_none());
    }

    #[test]
    fn test_first_insert_wins() {
        let mut trie = Trie::new();

        assert_eq!(trie.insert("學".chars(), "first"), Insertion::Added(1));
        assert_eq!(trie.insert("學".chars(), "second"), Insertion::Duplicate);

        assert_eq!(trie.len(), 1);
        assert_eq!(trie.lookup::<char, _>(&chars("學")).value(), Some(&"first"));
    }

    #[test]
    fn test_shorter_key_under_existing_prefix() {
        let mut trie = Trie::new();
        trie.insert("天下".chars(), 2);
        assert_eq!(trie.lookup::<char, _>(&chars("天")), Lookup::PrefixOnly);

        // An intermediate prefix can later become a key of its own
        assert_eq!(trie.insert("天".chars(), 1), Insertion::Added(1));
        assert_eq!(trie.lookup::<char, _>(&chars("天")), Lookup::Complete(&1));
    }

    #[test]
    fn test_empty_key_is_not_stored() {
        let mut trie: Trie<char, &str> = Trie::new();

        assert_eq!(trie.insert("".chars(), "x"), Insertion::Empty);
        assert!(trie.is_empty());
        assert!(!trie.root().is_match());
        assert_eq!(trie.max_key_len(), 0);
    }

    #[test]
    fn test_max_key_len_is_monotonic() {
        let mut trie = Trie::new();
        trie.insert("三個字".chars(), ());
        assert_eq!(trie.max_key_len(), 3);
        trie.insert("一".chars(), ());
        assert_eq!(trie.max_key_len(), 3);
        trie.insert("四個字的".chars(), ());
        assert_eq!(trie.max_key_len(), 4);
    }
}
