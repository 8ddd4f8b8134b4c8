use std::time::Instant;

use log::info;
use shapefit_board::BoardSample;

use crate::{BoxedKeyStore, FeatureKey, IndexBackend, decompose};

/// Dense, stable identifier of an indexed feature.
///
/// IDs are handed out sequentially from 0 in first-seen order and double as
/// positions in the weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct FeatureId(u32);

impl FeatureId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Position of this feature in a weight vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A sample reduced to its label and the IDs of its features.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedSample {
    label: f32,
    features: Vec<FeatureId>,
}

impl IndexedSample {
    #[must_use]
    pub fn new(label: f32, features: Vec<FeatureId>) -> Self {
        Self { label, features }
    }

    #[must_use]
    pub fn label(&self) -> f32 {
        self.label
    }

    /// Feature IDs in decomposition order.
    #[must_use]
    pub fn features(&self) -> &[FeatureId] {
        &self.features
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("feature key {key} appears twice (first as id {first})")]
pub struct DuplicateFeatureKey {
    pub key: FeatureKey,
    pub first: FeatureId,
}

/// Deduplicating map from canonical keys to [`FeatureId`]s.
///
/// The index only grows: once assigned, an ID is never reused or renumbered.
///
/// # Example
///
/// ```
/// use shapefit_board::{Board, BoardSample};
/// use shapefit_features::FeatureIndex;
///
/// let mut index = FeatureIndex::new();
/// let sample = BoardSample::new("PN/BR".parse::<Board>().unwrap(), 10.0);
///
/// let first = index.index_sample(&sample);
/// let second = index.index_sample(&sample);
/// assert_eq!(index.len(), 8);
/// assert_eq!(first, second);
/// ```
#[derive(Debug, Clone)]
pub struct FeatureIndex {
    backend: IndexBackend,
    store: BoxedKeyStore,
    keys: Vec<FeatureKey>,
}

impl Default for FeatureIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureIndex {
    /// Creates an empty index backed by a [`KeyTrie`](crate::KeyTrie).
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(IndexBackend::default())
    }

    #[must_use]
    pub fn with_backend(backend: IndexBackend) -> Self {
        Self {
            backend,
            store: backend.new_store(),
            keys: vec![],
        }
    }

    /// Rebuilds an index whose IDs are the positions of `keys`.
    pub fn from_keys<I>(backend: IndexBackend, keys: I) -> Result<Self, DuplicateFeatureKey>
    where
        I: IntoIterator<Item = FeatureKey>,
    {
        let mut index = Self::with_backend(backend);
        for key in keys {
            let (id, inserted) = index.lookup_or_insert(&key);
            if !inserted {
                return Err(DuplicateFeatureKey { key, first: id });
            }
        }
        Ok(index)
    }

    #[must_use]
    pub fn backend(&self) -> IndexBackend {
        self.backend
    }

    #[must_use]
    pub fn lookup(&self, key: &FeatureKey) -> Option<FeatureId> {
        self.store.get(key)
    }

    /// Returns the ID of `key`, assigning the next one if it is new.
    pub fn insert(&mut self, key: &FeatureKey) -> FeatureId {
        self.lookup_or_insert(key).0
    }

    /// Like [`Self::insert`], also reporting whether a new ID was assigned.
    pub fn lookup_or_insert(&mut self, key: &FeatureKey) -> (FeatureId, bool) {
        if let Some(id) = self.store.get(key) {
            return (id, false);
        }
        let id = u32::try_from(self.keys.len())
            .map(FeatureId)
            .unwrap_or_else(|_| panic!("feature index exceeded {} entries", u32::MAX));
        self.store.insert(key, id);
        self.keys.push(key.clone());
        (id, true)
    }

    /// Decomposes `sample` and maps every feature to its ID, inserting new ones.
    pub fn index_sample(&mut self, sample: &BoardSample) -> IndexedSample {
        let features = decompose::regions(sample.board())
            .map(|feature| self.insert(&FeatureKey::from_feature(&feature)))
            .collect();
        IndexedSample::new(sample.label(), features)
    }

    /// Indexes a whole sample set, in order.
    pub fn index_samples(&mut self, samples: &[BoardSample]) -> Vec<IndexedSample> {
        let start = Instant::now();
        let before = self.len();
        let indexed = samples
            .iter()
            .map(|sample| self.index_sample(sample))
            .collect::<Vec<_>>();
        info!(
            "indexed {} samples: {} new features, {} total ({:.2?})",
            samples.len(),
            self.len() - before,
            self.len(),
            start.elapsed()
        );
        indexed
    }

    /// Maps `sample` onto existing IDs without growing the index.
    ///
    /// Features never seen before are dropped; their count is returned
    /// alongside the sample.
    #[must_use]
    pub fn resolve_sample(&self, sample: &BoardSample) -> (IndexedSample, usize) {
        let mut unknown = 0;
        let features = decompose::regions(sample.board())
            .filter_map(|feature| {
                let id = self.lookup(&FeatureKey::from_feature(&feature));
                if id.is_none() {
                    unknown += 1;
                }
                id
            })
            .collect();
        (IndexedSample::new(sample.label(), features), unknown)
    }

    /// Number of distinct features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn key(&self, id: FeatureId) -> Option<&FeatureKey> {
        self.keys.get(id.index())
    }

    /// All keys, in ID order.
    #[must_use]
    pub fn keys(&self) -> &[FeatureKey] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use shapefit_board::{Board, fen};

    use super::*;

    fn sample(board: &str, label: f32) -> BoardSample {
        BoardSample::new(board.parse::<Board>().unwrap(), label)
    }

    fn key(s: &str) -> FeatureKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut index = FeatureIndex::new();
        let a = index.insert(&key("01100P"));
        let b = index.insert(&key("01100P"));
        assert_eq!(a, b);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup_or_insert(&key("01100P")), (a, false));
    }

    #[test]
    fn test_ids_are_sequential_in_first_seen_order() {
        let mut index = FeatureIndex::new();
        assert_eq!(index.insert(&key("01100P")), FeatureId::new(0));
        assert_eq!(index.insert(&key("01110P")), FeatureId::new(1));
        assert_eq!(index.insert(&key("01100P")), FeatureId::new(0));
        assert_eq!(index.insert(&key("01100k")), FeatureId::new(2));
        assert_eq!(index.key(FeatureId::new(1)), Some(&key("01110P")));
        assert_eq!(index.key(FeatureId::new(3)), None);
        assert_eq!(index.keys().len(), 3);
    }

    #[test]
    fn test_lookup_does_not_insert() {
        let index = FeatureIndex::new();
        assert_eq!(index.lookup(&key("01100P")), None);
        assert!(index.is_empty());
    }

    #[test]
    fn test_len_never_exceeds_distinct_keys() {
        let mut index = FeatureIndex::new();
        let samples = [sample("PN/BR", 1.0), sample("PN/BR", 2.0), sample("PN/Bq", 3.0)];
        let indexed = index.index_samples(&samples);

        let distinct = samples
            .iter()
            .flat_map(|s| decompose::regions(s.board()).map(|f| FeatureKey::from_feature(&f)))
            .collect::<HashSet<_>>();
        assert_eq!(index.len(), distinct.len());
        for sample in &indexed {
            assert_eq!(sample.features().len(), 8);
            assert!(sample.features().iter().all(|id| id.index() < index.len()));
        }
        assert_eq!(indexed[0].features(), indexed[1].features());
        assert_eq!(indexed[1].label(), 2.0);
    }

    #[test]
    fn test_no_blank_feature_indexed() {
        let mut index = FeatureIndex::new();
        let board = fen::parse_placement("8/8/8/3k4/8/8/8/4K3 w - - 0 1").unwrap();
        let _ = index.index_sample(&BoardSample::new(board, 0.0));
        assert!(!index.is_empty());
        assert!(index.keys().iter().all(|k| !k.to_feature().is_blank()));
    }

    #[test]
    fn test_backends_agree() {
        let samples = [
            sample("PNB/.../pnb", 1.0),
            sample("P../.k./..Q", -2.0),
            sample("PNB/.../pnb", 3.0),
        ];
        let mut trie = FeatureIndex::with_backend(IndexBackend::Trie);
        let mut hash = FeatureIndex::with_backend(IndexBackend::Hash);
        assert_eq!(trie.index_samples(&samples), hash.index_samples(&samples));
        assert_eq!(trie.keys(), hash.keys());
    }

    #[test]
    fn test_resolve_sample_reports_unknown() {
        let mut index = FeatureIndex::new();
        let _ = index.index_sample(&sample("PN/BR", 1.0));

        let (known, unknown) = index.resolve_sample(&sample("PN/BR", 1.0));
        assert_eq!(known.features().len(), 8);
        assert_eq!(unknown, 0);

        // only the top row and its two cells are shared
        let (partial, unknown) = index.resolve_sample(&sample("PN/qq", 1.0));
        assert_eq!(partial.features().len(), 3);
        assert_eq!(unknown, 5);
        assert_eq!(index.len(), 8);
    }

    #[test]
    fn test_from_keys() {
        let keys = vec![key("01100P"), key("01110P")];
        let index = FeatureIndex::from_keys(IndexBackend::Hash, keys.clone()).unwrap();
        assert_eq!(index.keys(), keys.as_slice());
        assert_eq!(index.lookup(&key("01110P")), Some(FeatureId::new(1)));

        let err = FeatureIndex::from_keys(IndexBackend::Trie, [key("01100P"), key("01100P")])
            .unwrap_err();
        assert_eq!(err.first, FeatureId::new(0));
    }
}
