//! Weight training for the additive shape-feature model.
//!
//! A board's predicted score is the sum of the weights of its shape features
//! ([`scorer`]). Training searches for weights that make those predictions
//! close to the sample labels, measured by [`metric::accuracy`].
//!
//! # How Training Works
//!
//! 1. **Indexing** - [`Trainer::add_samples`] decomposes every sample and
//!    assigns feature IDs; the weight vector grows to match
//! 2. **Mutation** - each round copies the best weights and perturbs a random
//!    subset of them ([`weights::mutate_uniform`])
//! 3. **Scoring** - the candidate is scored against the (optionally
//!    truncated) sample set, in parallel ([`metric::mean_accuracy`])
//! 4. **Acceptance** - a strictly better candidate becomes the new best
//! 5. **Repeat** - until the round budget or the target metric is reached
//!
//! The search is blind: no gradients, no population, no annealing schedule.
//!
//! # Persistence
//!
//! The best weights can be written as a flat `f32` file ([`weight_file`]).
//!
//! # Example
//!
//! ```
//! use shapefit_board::{Board, BoardSample};
//! use shapefit_features::FeatureIndex;
//! use shapefit_training::{Trainer, TrainerConfig};
//!
//! let config = TrainerConfig {
//!     rounds: 100,
//!     ..TrainerConfig::default()
//! };
//! let mut trainer = Trainer::new(config, FeatureIndex::new()).unwrap();
//! trainer.add_samples(&[BoardSample::new("PN/BR".parse::<Board>().unwrap(), 20.0)]);
//!
//! let before = trainer.best_metric();
//! let outcome = trainer.train();
//! assert!(outcome.best_metric >= before);
//! ```

pub use self::{
    config::{ConfigError, TrainerConfig},
    trainer::{RoundReport, StopReason, Trainer, TrainingOutcome},
    weight_file::WeightFileError,
    weights::{WeightLengthMismatch, WeightVector},
};

mod config;
pub mod metric;
pub mod scorer;
mod trainer;
pub mod weight_file;
pub mod weights;
