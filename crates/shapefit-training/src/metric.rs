//! Accuracy metric.
//!
//! The accuracy of a single prediction is a closeness score in `[0, 1]`:
//!
//! - for a non-zero expected value `e`: `clamp(1 - |p - e| / e, 0, 1)`
//! - for `e == 0`: `1` if `p <= 0`, else `0`
//!
//! The relative error is divided by `e` itself, not `|e|`. For a negative
//! expected value the ratio is never positive, so any prediction saturates to
//! `1`; training data with negative labels therefore contributes a constant
//! to the metric.

use std::thread;

use shapefit_features::IndexedSample;

use crate::scorer;

/// Accuracy of `actual` against `expected`.
///
/// # Examples
///
/// ```
/// use shapefit_training::metric::accuracy;
///
/// assert_eq!(accuracy(10.0, 10.0), 1.0);
/// assert_eq!(accuracy(5.0, 10.0), 0.5);
/// assert_eq!(accuracy(-5.0, 0.0), 1.0);
/// assert_eq!(accuracy(5.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn accuracy(actual: f32, expected: f32) -> f32 {
    if expected == 0.0 {
        if actual <= 0.0 { 1.0 } else { 0.0 }
    } else {
        (1.0 - (actual - expected).abs() / expected).clamp(0.0, 1.0)
    }
}

/// Label range applied before comparing predictions.
///
/// Labels far outside the range (mate scores, for instance) would otherwise
/// dominate the error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelClamp {
    pub min: f32,
    pub max: f32,
}

impl LabelClamp {
    /// # Panics
    ///
    /// Panics if `min > max` or either bound is NaN.
    #[must_use]
    pub fn apply(self, label: f32) -> f32 {
        label.clamp(self.min, self.max)
    }
}

/// Accuracy of one indexed sample under `weights`.
#[must_use]
pub fn sample_accuracy(sample: &IndexedSample, weights: &[f32], clamp: LabelClamp) -> f32 {
    let predicted = scorer::predict(sample.features(), weights);
    accuracy(predicted, clamp.apply(sample.label()))
}

/// Mean accuracy over `samples`, scored on up to `threads` threads.
///
/// Samples are split into contiguous chunks, one per thread. Each chunk is
/// summed in order and the chunk sums are added in chunk order, so the result
/// only depends on the inputs and `threads`. The mean of no samples is `0`.
#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn mean_accuracy(
    samples: &[IndexedSample],
    weights: &[f32],
    clamp: LabelClamp,
    threads: usize,
) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let chunk_sum = |chunk: &[IndexedSample]| -> f64 {
        chunk
            .iter()
            .map(|sample| f64::from(sample_accuracy(sample, weights, clamp)))
            .sum()
    };

    let threads = threads.clamp(1, samples.len());
    let total = if threads == 1 {
        chunk_sum(samples)
    } else {
        let chunk_size = samples.len().div_ceil(threads);
        thread::scope(|s| {
            let handles = samples
                .chunks(chunk_size)
                .map(|chunk| s.spawn(move || chunk_sum(chunk)))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .sum::<f64>()
        })
    };

    (total / samples.len() as f64) as f32
}

/// Summary statistics of per-sample accuracies.
#[derive(Debug, Clone)]
pub struct AccuracySummary {
    pub count: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
}

impl AccuracySummary {
    /// Summarizes `values`, or returns `None` if there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use shapefit_training::metric::AccuracySummary;
    ///
    /// let summary = AccuracySummary::new([0.5, 1.0, 0.0]).unwrap();
    /// assert_eq!(summary.min, 0.0);
    /// assert_eq!(summary.max, 1.0);
    /// assert_eq!(summary.mean, 0.5);
    /// assert_eq!(summary.median, 0.5);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let sum = values.iter().copied().map(f64::from).sum::<f64>();
        #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let mean = (sum / values.len() as f64) as f32;
        let median = values[values.len() / 2];
        Some(Self {
            count: values.len(),
            min,
            max,
            mean,
            median,
        })
    }
}

#[cfg(test)]
mod tests {
    use shapefit_features::FeatureId;

    use super::*;

    const WIDE: LabelClamp = LabelClamp {
        min: -500.0,
        max: 500.0,
    };

    #[test]
    fn test_accuracy_bounds() {
        for actual in [-1000.0, -3.0, 0.0, 0.5, 7.0, 1e6] {
            for expected in [-500.0, -1.0, 0.0, 1.0, 10.0, 500.0] {
                let a = accuracy(actual, expected);
                assert!((0.0..=1.0).contains(&a), "accuracy({actual}, {expected}) = {a}");
            }
        }
    }

    #[test]
    fn test_accuracy_zero_expected() {
        assert_eq!(accuracy(-5.0, 0.0), 1.0);
        assert_eq!(accuracy(0.0, 0.0), 1.0);
        assert_eq!(accuracy(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_accuracy_negative_expected_saturates() {
        assert_eq!(accuracy(100.0, -10.0), 1.0);
        assert_eq!(accuracy(-10.0, -10.0), 1.0);
    }

    #[test]
    fn test_accuracy_positive_expected() {
        assert_eq!(accuracy(10.0, 10.0), 1.0);
        assert_eq!(accuracy(15.0, 10.0), 0.5);
        assert_eq!(accuracy(30.0, 10.0), 0.0);
    }

    #[test]
    fn test_label_is_clamped() {
        let sample = IndexedSample::new(9999.0, vec![FeatureId::new(0)]);
        assert_eq!(sample_accuracy(&sample, &[500.0], WIDE), 1.0);
    }

    #[test]
    fn test_mean_accuracy_empty_is_zero() {
        assert_eq!(mean_accuracy(&[], &[], WIDE, 4), 0.0);
    }

    #[test]
    fn test_mean_accuracy_threads() {
        let samples = (1..=37_u8)
            .map(|label| IndexedSample::new(f32::from(label), vec![FeatureId::new(0)]))
            .collect::<Vec<_>>();
        let weights = [10.0];
        let single = mean_accuracy(&samples, &weights, WIDE, 1);
        for threads in [2, 3, 8, 100] {
            let parallel = mean_accuracy(&samples, &weights, WIDE, threads);
            assert!((single - parallel).abs() < 1e-6, "{threads}: {single} vs {parallel}");
            assert_eq!(parallel, mean_accuracy(&samples, &weights, WIDE, threads));
        }
    }

    #[test]
    fn test_summary_empty() {
        assert!(AccuracySummary::new([]).is_none());
    }
}
