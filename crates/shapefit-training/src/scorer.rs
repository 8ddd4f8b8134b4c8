//! Additive scoring.

use shapefit_features::FeatureId;

/// Predicted score of a sample: the plain sum of its feature weights.
///
/// # Panics
///
/// Panics if a feature ID is outside `weights`.
///
/// # Examples
///
/// ```
/// use shapefit_features::FeatureId;
/// use shapefit_training::scorer;
///
/// let weights = [1.0, -2.0, 0.5];
/// let ids = [FeatureId::new(0), FeatureId::new(2), FeatureId::new(2)];
/// assert_eq!(scorer::predict(&ids, &weights), 2.0);
/// assert_eq!(scorer::predict(&[], &weights), 0.0);
/// ```
#[must_use]
pub fn predict(features: &[FeatureId], weights: &[f32]) -> f32 {
    features.iter().map(|id| weights[id.index()]).sum()
}
