//! Key-to-ID storage behind [`FeatureIndex`](crate::FeatureIndex).

use std::{collections::HashMap, fmt};

use crate::{FeatureId, FeatureKey, key::ALPHABET_LEN};

/// Map from canonical keys to feature IDs.
///
/// Implementations only store and find entries; ID assignment and the
/// first-seen ordering live in [`FeatureIndex`](crate::FeatureIndex).
pub trait KeyStore: fmt::Debug + Send + Sync {
    #[must_use]
    fn get(&self, key: &FeatureKey) -> Option<FeatureId>;

    /// Stores `id` under `key`. The key must not be present yet.
    fn insert(&mut self, key: &FeatureKey, id: FeatureId);

    #[must_use]
    fn len(&self) -> usize;

    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    fn clone_boxed(&self) -> BoxedKeyStore;
}

pub type BoxedKeyStore = Box<dyn KeyStore>;

impl Clone for BoxedKeyStore {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Selects the [`KeyStore`] implementation used by an index.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub enum IndexBackend {
    /// [`KeyTrie`]
    #[default]
    Trie,
    /// [`HashKeyStore`]
    Hash,
}

impl IndexBackend {
    #[must_use]
    pub fn new_store(self) -> BoxedKeyStore {
        match self {
            IndexBackend::Trie => Box::new(KeyTrie::new()),
            IndexBackend::Hash => Box::new(HashKeyStore::default()),
        }
    }
}

#[derive(Debug, Clone)]
struct TrieNode {
    // 0 means "no child": the root is node 0 and is never anyone's child
    children: [u32; ALPHABET_LEN],
    value: Option<FeatureId>,
}

impl TrieNode {
    const EMPTY: Self = Self {
        children: [0; ALPHABET_LEN],
        value: None,
    };
}

/// Character-indexed trie over the key alphabet.
///
/// Nodes live in one arena and refer to their children by position, with one
/// fixed slot per alphabet symbol, so each key character costs a single
/// table lookup. Keys share the trie path of their common prefix, which for
/// decomposed boards is mostly the geometry header.
#[derive(Debug, Clone)]
pub struct KeyTrie {
    nodes: Vec<TrieNode>,
    len: usize,
}

impl Default for KeyTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyTrie {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::EMPTY],
            len: 0,
        }
    }

    /// Number of allocated nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn find(&self, key: &FeatureKey) -> Option<&TrieNode> {
        let mut node = &self.nodes[0];
        for symbol in key.symbols() {
            match node.children[symbol] {
                0 => return None,
                child => node = &self.nodes[child as usize],
            }
        }
        Some(node)
    }
}

impl KeyStore for KeyTrie {
    fn get(&self, key: &FeatureKey) -> Option<FeatureId> {
        self.find(key).and_then(|node| node.value)
    }

    fn insert(&mut self, key: &FeatureKey, id: FeatureId) {
        let mut current = 0;
        for symbol in key.symbols() {
            current = match self.nodes[current].children[symbol] {
                0 => {
                    let child = self.nodes.len();
                    let link = u32::try_from(child).unwrap_or_else(|_| {
                        panic!("feature trie exceeded {} nodes", u32::MAX)
                    });
                    self.nodes.push(TrieNode::EMPTY);
                    self.nodes[current].children[symbol] = link;
                    child
                }
                child => child as usize,
            };
        }
        let previous = self.nodes[current].value.replace(id);
        debug_assert!(previous.is_none(), "key {key} inserted twice");
        self.len += 1;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clone_boxed(&self) -> BoxedKeyStore {
        Box::new(self.clone())
    }
}

/// Hash map keyed by the full canonical key.
#[derive(Debug, Clone, Default)]
pub struct HashKeyStore {
    map: HashMap<FeatureKey, FeatureId>,
}

impl KeyStore for HashKeyStore {
    fn get(&self, key: &FeatureKey) -> Option<FeatureId> {
        self.map.get(key).copied()
    }

    fn insert(&mut self, key: &FeatureKey, id: FeatureId) {
        let previous = self.map.insert(key.clone(), id);
        debug_assert!(previous.is_none(), "key {key} inserted twice");
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clone_boxed(&self) -> BoxedKeyStore {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> FeatureKey {
        s.parse().unwrap()
    }

    fn check_store(mut store: BoxedKeyStore) {
        assert!(store.is_empty());
        assert_eq!(store.get(&key("01100P")), None);

        store.insert(&key("01100P"), FeatureId::new(0));
        store.insert(&key("01110P"), FeatureId::new(1));
        store.insert(&key("02100Pp"), FeatureId::new(2));

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&key("01100P")), Some(FeatureId::new(0)));
        assert_eq!(store.get(&key("01110P")), Some(FeatureId::new(1)));
        assert_eq!(store.get(&key("02100Pp")), Some(FeatureId::new(2)));
        // same pattern, other geometry
        assert_eq!(store.get(&key("01101P")), None);
        assert_eq!(store.get(&key("02100PP")), None);
    }

    #[test]
    fn test_trie() {
        check_store(IndexBackend::Trie.new_store());
    }

    #[test]
    fn test_hash() {
        check_store(IndexBackend::Hash.new_store());
    }

    #[test]
    fn test_trie_miss_after_partial_match() {
        let mut trie = KeyTrie::new();
        trie.insert(&key("02100Pp"), FeatureId::new(0));
        assert_eq!(trie.get(&key("02100Pp")), Some(FeatureId::new(0)));
        assert_eq!(trie.get(&key("02100PP")), None);
        assert_eq!(trie.node_count(), 1 + 7);
    }

    #[test]
    fn test_trie_shares_header_prefix() {
        let mut trie = KeyTrie::new();
        trie.insert(&key("01100P"), FeatureId::new(0));
        trie.insert(&key("01100p"), FeatureId::new(1));
        // 5 header nodes shared, then one leaf each
        assert_eq!(trie.node_count(), 1 + 5 + 2);
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Trie".parse::<IndexBackend>().unwrap(), IndexBackend::Trie);
        assert_eq!("hash".parse::<IndexBackend>().unwrap(), IndexBackend::Hash);
    }
}
