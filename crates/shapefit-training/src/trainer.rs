//! Stochastic local search over the weight vector.
//!
//! Each round copies the best weights, perturbs them with
//! [`weights::mutate_uniform`], and scores the candidate against the
//! training samples with [`metric::mean_accuracy`]. The candidate replaces the
//! best weights only if it scores strictly higher, so the best metric never
//! decreases from one round to the next.
//!
//! All random draws happen on the calling thread from a single [`Pcg32`]
//! seeded from [`TrainerConfig::seed`]. Scoring may run on several threads,
//! but partial sums are combined in a fixed order, so a run is reproducible
//! for a given seed and thread count.

use std::{ops::ControlFlow, time::Instant};

use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use shapefit_board::BoardSample;
use shapefit_features::{FeatureIndex, IndexedSample};

use crate::{
    ConfigError, TrainerConfig, metric,
    weights::{self, WeightLengthMismatch, WeightVector},
};

/// Outcome of a single round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundReport {
    /// 1-based number of the round.
    pub round: u64,
    /// Metric of this round's candidate.
    pub metric: f32,
    /// Best metric after this round.
    pub best_metric: f32,
    pub accepted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum StopReason {
    #[display("round budget exhausted")]
    RoundBudget,
    #[display("target metric reached")]
    TargetReached,
    #[display("interrupted")]
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOutcome {
    /// Rounds run by this call.
    pub rounds_run: u64,
    pub best_metric: f32,
    pub stop_reason: StopReason,
}

/// Owns the feature index, the samples and the weights of one training run.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
    index: FeatureIndex,
    samples: Vec<IndexedSample>,
    best: WeightVector,
    current: WeightVector,
    best_metric: f32,
    round: u64,
    rng: Pcg32,
}

impl Trainer {
    /// Creates a trainer over `index` with all-zero weights and no samples.
    pub fn new(config: TrainerConfig, index: FeatureIndex) -> Result<Self, ConfigError> {
        config.validate()?;
        let best = WeightVector::zeroed(index.len());
        let current = best.clone();
        let rng = Pcg32::seed_from_u64(config.seed);
        Ok(Self {
            config,
            index,
            samples: vec![],
            best,
            current,
            best_metric: 0.0,
            round: 0,
            rng,
        })
    }

    /// Indexes `samples` and appends them to the training set.
    ///
    /// New features start with weight 0. The best metric is recomputed for
    /// the enlarged set.
    pub fn add_samples(&mut self, samples: &[BoardSample]) {
        let indexed = self.index.index_samples(samples);
        self.samples.extend(indexed);
        self.best.grow_to(self.index.len());
        self.current.grow_to(self.index.len());
        self.best_metric = self.evaluate(&self.best);
        info!(
            "{} samples, {} features, initial metric {:.6}",
            self.samples.len(),
            self.index.len(),
            self.best_metric
        );
    }

    /// Replaces the best weights, e.g. with weights loaded from a previous run.
    pub fn set_weights(&mut self, weights: WeightVector) -> Result<(), WeightLengthMismatch> {
        if weights.len() != self.index.len() {
            return Err(WeightLengthMismatch {
                expected: self.index.len(),
                found: weights.len(),
            });
        }
        self.best = weights;
        self.current.copy_from(&self.best);
        self.best_metric = self.evaluate(&self.best);
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    #[must_use]
    pub fn index(&self) -> &FeatureIndex {
        &self.index
    }

    #[must_use]
    pub fn samples(&self) -> &[IndexedSample] {
        &self.samples
    }

    #[must_use]
    pub fn best_weights(&self) -> &WeightVector {
        &self.best
    }

    #[must_use]
    pub fn best_metric(&self) -> f32 {
        self.best_metric
    }

    /// Number of rounds run so far.
    #[must_use]
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Samples scored each round: a prefix of `sample_size`, or all of them.
    #[must_use]
    pub fn evaluated_samples(&self) -> &[IndexedSample] {
        let len = self
            .config
            .sample_size
            .map_or(self.samples.len(), |size| size.min(self.samples.len()));
        &self.samples[..len]
    }

    /// Mean accuracy of `weights` over the evaluated samples.
    #[must_use]
    pub fn evaluate(&self, weights: &WeightVector) -> f32 {
        metric::mean_accuracy(
            self.evaluated_samples(),
            weights.as_slice(),
            self.config.label_clamp(),
            self.config.threads,
        )
    }

    /// Runs one mutate-score-accept round.
    pub fn step(&mut self) -> RoundReport {
        self.round += 1;
        self.current.copy_from(&self.best);
        weights::mutate_uniform(
            self.current.as_mut_slice(),
            self.config.mutation_frequency,
            self.config.mutation_magnitude,
            &mut self.rng,
        );

        let metric = self.evaluate(&self.current);
        let accepted = metric > self.best_metric;
        if accepted {
            debug!(
                "round {}: improved {:.6} -> {:.6}",
                self.round, self.best_metric, metric
            );
            std::mem::swap(&mut self.best, &mut self.current);
            self.best_metric = metric;
        }

        RoundReport {
            round: self.round,
            metric,
            best_metric: self.best_metric,
            accepted,
        }
    }

    fn target_reached(&self) -> bool {
        self.config
            .target_metric
            .is_some_and(|target| self.best_metric >= target)
    }

    /// Runs rounds until the budget is spent, the target metric is reached,
    /// or `on_round` breaks.
    ///
    /// The round budget counts every round this trainer has run, so calling
    /// `run` again after an interruption continues where it stopped.
    pub fn run<F>(&mut self, mut on_round: F) -> TrainingOutcome
    where
        F: FnMut(&RoundReport) -> ControlFlow<()>,
    {
        let start = Instant::now();
        let first_round = self.round;
        info!(
            "training: rounds {}..{}, {} evaluated samples, {} features",
            first_round,
            self.config.rounds,
            self.evaluated_samples().len(),
            self.index.len()
        );

        let stop_reason = loop {
            if self.target_reached() {
                break StopReason::TargetReached;
            }
            if self.round >= self.config.rounds {
                break StopReason::RoundBudget;
            }

            let report = self.step();
            if self.config.report_interval > 0 && report.round % self.config.report_interval == 0 {
                info!(
                    "round {}: best metric {:.6} ({:.2?})",
                    report.round,
                    report.best_metric,
                    start.elapsed()
                );
            }
            if on_round(&report).is_break() {
                break StopReason::Interrupted;
            }
        };

        let outcome = TrainingOutcome {
            rounds_run: self.round - first_round,
            best_metric: self.best_metric,
            stop_reason,
        };
        info!(
            "training stopped after {} rounds ({stop_reason}): best metric {:.6} ({:.2?})",
            outcome.rounds_run,
            outcome.best_metric,
            start.elapsed()
        );
        outcome
    }

    /// Runs to completion without a callback.
    pub fn train(&mut self) -> TrainingOutcome {
        self.run(|_| ControlFlow::Continue(()))
    }

    /// Consumes the trainer, returning the index, the best weights and their metric.
    #[must_use]
    pub fn into_parts(self) -> (FeatureIndex, WeightVector, f32) {
        (self.index, self.best, self.best_metric)
    }
}
