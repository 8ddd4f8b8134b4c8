use serde::{Deserialize, Serialize};

use crate::metric::LabelClamp;

/// Trainer configuration.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it changes.
///
/// # Example
///
/// ```
/// use shapefit_training::TrainerConfig;
///
/// let config: TrainerConfig =
///     serde_json::from_str(r#"{ "rounds": 5000, "sample_size": 200 }"#).unwrap();
/// assert_eq!(config.rounds, 5000);
/// assert_eq!(config.sample_size, Some(200));
/// assert_eq!(config.mutation_frequency, TrainerConfig::default().mutation_frequency);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    /// Probability that a single weight is perturbed in a round, in `(0, 1]`.
    pub mutation_frequency: f32,
    /// Perturbations are drawn from `[-mutation_magnitude, mutation_magnitude]`.
    pub mutation_magnitude: f32,
    /// Total number of rounds before training stops.
    pub rounds: u64,
    /// Labels are clamped into `[eval_clamp_min, eval_clamp_max]` before scoring.
    pub eval_clamp_min: f32,
    pub eval_clamp_max: f32,
    pub seed: u64,
    /// Score only the first `sample_size` samples. All samples when unset.
    pub sample_size: Option<usize>,
    /// Stop as soon as the best metric reaches this value.
    pub target_metric: Option<f32>,
    /// Scoring threads.
    pub threads: usize,
    /// Log progress every `report_interval` rounds. `0` disables progress logs.
    pub report_interval: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            mutation_frequency: 0.1,
            mutation_magnitude: 1.0,
            rounds: 200_000,
            eval_clamp_min: -500.0,
            eval_clamp_max: 500.0,
            seed: 12345,
            sample_size: None,
            target_metric: None,
            threads: 1,
            report_interval: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("mutation_frequency must be in (0, 1], got {value}")]
    MutationFrequency { value: f32 },
    #[display("mutation_magnitude must be positive and finite, got {value}")]
    MutationMagnitude { value: f32 },
    #[display("eval clamp range [{min}, {max}] is empty or not finite")]
    ClampRange { min: f32, max: f32 },
    #[display("sample_size must be at least 1")]
    EmptySampleSize,
    #[display("target_metric must be in [0, 1], got {value}")]
    TargetMetric { value: f32 },
    #[display("threads must be at least 1")]
    NoThreads,
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let frequency = self.mutation_frequency;
        if !(frequency > 0.0 && frequency <= 1.0) {
            return Err(ConfigError::MutationFrequency { value: frequency });
        }
        let magnitude = self.mutation_magnitude;
        if !(magnitude.is_finite() && magnitude > 0.0) {
            return Err(ConfigError::MutationMagnitude { value: magnitude });
        }
        let (min, max) = (self.eval_clamp_min, self.eval_clamp_max);
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(ConfigError::ClampRange { min, max });
        }
        if self.sample_size == Some(0) {
            return Err(ConfigError::EmptySampleSize);
        }
        if let Some(value) = self.target_metric.filter(|v| !(0.0..=1.0).contains(v)) {
            return Err(ConfigError::TargetMetric { value });
        }
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        Ok(())
    }

    #[must_use]
    pub fn label_clamp(&self) -> LabelClamp {
        LabelClamp {
            min: self.eval_clamp_min,
            max: self.eval_clamp_max,
        }
    }
}
