//! Shape features and the feature index.
//!
//! A board is decomposed into every rectangular sub-region ([`decompose`]).
//! Each region becomes a [`ShapeFeature`], serialized into a canonical
//! [`FeatureKey`] that includes the region geometry, and the
//! [`FeatureIndex`] maps those keys onto dense [`FeatureId`]s shared across
//! all samples.

pub use self::{
    index::{DuplicateFeatureKey, FeatureId, FeatureIndex, IndexedSample},
    key::{FeatureKey, InvalidFeatureEncoding},
    shape::{ShapeDescriptor, ShapeFeature, ShapeKind},
    store::{BoxedKeyStore, HashKeyStore, IndexBackend, KeyStore, KeyTrie},
};

pub mod decompose;
mod index;
pub mod key;
mod shape;
mod store;
