use std::{num::NonZeroUsize, path::PathBuf, thread};

use anyhow::Context;
use log::info;
use shapefit_features::{FeatureIndex, IndexBackend};
use shapefit_training::{Trainer, TrainerConfig, weight_file};

use crate::{
    model::{FeatureOrder, TrainedModel},
    util::{self, Output},
};

/// Overrides for values of the trainer configuration
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainerConfigArg {
    /// Number of mutation rounds
    #[arg(long)]
    rounds: Option<u64>,
    /// Probability that each weight is perturbed in a round, in (0, 1]
    #[arg(long)]
    mutation_frequency: Option<f32>,
    /// Maximum absolute perturbation of a weight
    #[arg(long)]
    mutation_magnitude: Option<f32>,
    /// Lower bound labels are clamped to before scoring
    #[arg(long, allow_negative_numbers = true)]
    eval_clamp_min: Option<f32>,
    /// Upper bound labels are clamped to before scoring
    #[arg(long, allow_negative_numbers = true)]
    eval_clamp_max: Option<f32>,
    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Score only the first N samples each round
    #[arg(long)]
    sample_size: Option<usize>,
    /// Stop once the best metric reaches this value
    #[arg(long)]
    target_metric: Option<f32>,
    /// Scoring threads [default: available parallelism]
    #[arg(long)]
    threads: Option<usize>,
    /// Log progress every N rounds (0 disables)
    #[arg(long)]
    report_interval: Option<u64>,
}

impl TrainerConfigArg {
    fn apply(&self, config: &mut TrainerConfig) {
        let Self {
            rounds,
            mutation_frequency,
            mutation_magnitude,
            eval_clamp_min,
            eval_clamp_max,
            seed,
            sample_size,
            target_metric,
            threads,
            report_interval,
        } = self;
        if let Some(v) = rounds {
            config.rounds = *v;
        }
        if let Some(v) = mutation_frequency {
            config.mutation_frequency = *v;
        }
        if let Some(v) = mutation_magnitude {
            config.mutation_magnitude = *v;
        }
        if let Some(v) = eval_clamp_min {
            config.eval_clamp_min = *v;
        }
        if let Some(v) = eval_clamp_max {
            config.eval_clamp_max = *v;
        }
        if let Some(v) = seed {
            config.seed = *v;
        }
        if let Some(v) = sample_size {
            config.sample_size = Some(*v);
        }
        if let Some(v) = target_metric {
            config.target_metric = Some(*v);
        }
        if let Some(v) = threads {
            config.threads = *v;
        }
        if let Some(v) = report_interval {
            config.report_interval = *v;
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training data: CSV records of `FEN,Evaluation`
    input: PathBuf,
    /// Read at most N samples
    #[arg(long)]
    limit: Option<usize>,
    /// Trainer configuration JSON file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[clap(flatten)]
    overrides: TrainerConfigArg,
    /// Feature index backend (trie or hash)
    #[arg(long, default_value = "trie")]
    backend: IndexBackend,
    /// Start from the weights in this flat f32 file
    #[arg(long)]
    weights_in: Option<PathBuf>,
    /// Write the best weights to this flat f32 file
    #[arg(long)]
    weights_out: Option<PathBuf>,
    /// Model output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Model name
    #[arg(long, default_value = "shapefit")]
    name: String,
    /// Number of top features to print
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Order of the printed top features (weight or magnitude)
    #[arg(long, default_value = "weight")]
    order: FeatureOrder,
}

fn load_config(arg: &TrainArg) -> anyhow::Result<TrainerConfig> {
    let mut config = match &arg.config {
        Some(path) => util::read_json_file("trainer config", path)?,
        None => TrainerConfig {
            threads: thread::available_parallelism().map_or(1, NonZeroUsize::get),
            ..TrainerConfig::default()
        },
    };
    arg.overrides.apply(&mut config);
    Ok(config)
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = load_config(arg)?;
    let mut trainer = Trainer::new(config, FeatureIndex::with_backend(arg.backend))
        .context("Invalid trainer configuration")?;

    let samples = util::read_samples_file(&arg.input, arg.limit)?;
    trainer.add_samples(&samples);
    drop(samples);

    if let Some(path) = &arg.weights_in {
        let weights = weight_file::load_weights_or_zeroed(path, trainer.index().len());
        trainer.set_weights(weights)?;
        info!("starting from {}: metric {:.6}", path.display(), trainer.best_metric());
    }

    let outcome = trainer.train();

    if let Some(path) = &arg.weights_out {
        weight_file::save_weights(path, trainer.best_weights().as_slice())
            .with_context(|| format!("Failed to save weights: {}", path.display()))?;
    }

    let model = TrainedModel::from_trainer(&arg.name, &trainer);
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Training completed: {}", outcome.stop_reason);
    eprintln!("  Rounds: {} ({} this run)", model.rounds, outcome.rounds_run);
    eprintln!("  Samples: {}", trainer.samples().len());
    eprintln!("  Evaluated samples: {}", trainer.evaluated_samples().len());
    eprintln!("  Features: {}", model.features.len());
    eprintln!("  Best metric: {:.6}", model.best_metric);
    if let Some(path) = &arg.weights_out {
        eprintln!("  Weights: {}", path.display());
    }
    if let Some(path) = &arg.output {
        eprintln!("  Model: {}", path.display());
    }

    let top = model.top_features(arg.top, arg.order);
    if !top.is_empty() {
        eprintln!();
        eprintln!("Top {} features ({:?}):", top.len(), arg.order);
        for feature in top {
            let descriptor = feature.key.descriptor();
            eprintln!(
                "  {:+.4}  {}x{} at ({}, {})",
                feature.weight,
                descriptor.width,
                descriptor.height,
                descriptor.offset_x,
                descriptor.offset_y
            );
            for line in feature.key.to_feature().to_string().lines() {
                eprintln!("      {line}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct TestArgs {
        #[clap(flatten)]
        train: TrainArg,
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = TestArgs::parse_from([
            "shapefit",
            "data.csv",
            "--rounds",
            "10",
            "--eval-clamp-min",
            "-100",
            "--sample-size",
            "5",
            "--threads",
            "2",
            "--backend",
            "hash",
        ]);
        let config = load_config(&args.train).unwrap();
        assert_eq!(config.rounds, 10);
        assert_eq!(config.eval_clamp_min, -100.0);
        assert_eq!(config.eval_clamp_max, TrainerConfig::default().eval_clamp_max);
        assert_eq!(config.sample_size, Some(5));
        assert_eq!(config.threads, 2);
        assert_eq!(args.train.backend, IndexBackend::Hash);
        assert_eq!(args.train.order, FeatureOrder::Weight);
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("shapefit-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "rounds": 7, "seed": 99, "threads": 3 }"#).unwrap();

        let args = TestArgs::parse_from([
            OsStr::new("shapefit"),
            OsStr::new("data.csv"),
            OsStr::new("--config"),
            path.as_os_str(),
            OsStr::new("--seed"),
            OsStr::new("5"),
        ]);
        let config = load_config(&args.train).unwrap();
        assert_eq!(config.rounds, 7);
        assert_eq!(config.seed, 5);
        assert_eq!(config.threads, 3);

        std::fs::remove_file(&path).unwrap();
    }
}
