//! Weight vector storage and mutation.
//!
//! Weights are indexed by [`FeatureId`]: the weight of feature `id` lives at
//! position `id.index()`. A vector only ever grows, so IDs handed out by the
//! [`FeatureIndex`](shapefit_features::FeatureIndex) stay valid.

use rand::Rng;
use shapefit_features::FeatureId;

/// One weight per indexed feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightVector(Vec<f32>);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("weight vector has {found} entries, expected {expected}")]
pub struct WeightLengthMismatch {
    pub expected: usize,
    pub found: usize,
}

impl WeightVector {
    /// Creates `len` weights, all zero.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    /// Extends the vector with zeros up to `len`. Never shrinks.
    pub fn grow_to(&mut self, len: usize) {
        if len > self.0.len() {
            self.0.resize(len, 0.0);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weight of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside the vector.
    #[must_use]
    pub fn get(&self, id: FeatureId) -> f32 {
        self.0[id.index()]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.0
    }

    /// Overwrites this vector with `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &WeightVector) {
        self.0.clone_from(&other.0);
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for WeightVector {
    fn from(weights: Vec<f32>) -> Self {
        Self(weights)
    }
}

/// Applies uniform mutation to a weight vector in-place.
///
/// For each weight, a value `u` is drawn from `[0, 1)`; when `u < frequency`,
/// a delta drawn uniformly from `[-magnitude, magnitude]` is added. Weights
/// are not clamped.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_pcg::Pcg32;
/// use shapefit_training::weights;
///
/// let mut rng = Pcg32::seed_from_u64(1);
/// let mut w = vec![0.0; 16];
/// weights::mutate_uniform(&mut w, 1.0, 0.5, &mut rng);
/// assert!(w.iter().all(|v| (-0.5..=0.5).contains(v)));
/// ```
pub fn mutate_uniform<R>(weights: &mut [f32], frequency: f32, magnitude: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for w in weights {
        if rng.random::<f32>() < frequency {
            *w += rng.random_range(-magnitude..=magnitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_grow_to_is_append_only() {
        let mut weights = WeightVector::from(vec![1.0, 2.0]);
        weights.grow_to(4);
        assert_eq!(weights.as_slice(), &[1.0, 2.0, 0.0, 0.0]);
        weights.grow_to(1);
        assert_eq!(weights.len(), 4);
    }

    #[test]
    fn test_mutate_with_full_frequency_touches_every_weight() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut weights = vec![10.0; 100];
        mutate_uniform(&mut weights, 1.0, 1.0, &mut rng);
        assert!(weights.iter().all(|w| (9.0..=11.0).contains(w)));
        assert!(weights.iter().any(|&w| w != 10.0));
    }

    #[test]
    fn test_mutate_frequency_is_respected() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut weights = vec![0.0; 10_000];
        mutate_uniform(&mut weights, 0.1, 1.0, &mut rng);
        let changed = weights.iter().filter(|&&w| w != 0.0).count();
        assert!((800..1200).contains(&changed), "{changed}");
    }

    #[test]
    fn test_mutate_is_deterministic_for_seed() {
        let run = || {
            let mut rng = Pcg32::seed_from_u64(3);
            let mut weights = vec![0.0; 50];
            mutate_uniform(&mut weights, 0.5, 2.0, &mut rng);
            weights
        };
        assert_eq!(run(), run());
    }
}
