use std::path::PathBuf;

use shapefit_features::IndexBackend;
use shapefit_training::{
    metric::{self, AccuracySummary},
    scorer,
};

use crate::{model::TrainedModel, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Model JSON file written by `train`
    #[arg(long)]
    model: PathBuf,
    /// CSV records of `FEN,Evaluation`
    input: PathBuf,
    /// Read at most N samples
    #[arg(long)]
    limit: Option<usize>,
    /// Feature index backend (trie or hash)
    #[arg(long, default_value = "trie")]
    backend: IndexBackend,
    /// Print one line per sample
    #[arg(long)]
    verbose: bool,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        model,
        input,
        limit,
        backend,
        verbose,
    } = arg;

    let model = TrainedModel::open(model)?;
    let (index, weights) = model.to_index_and_weights(*backend)?;
    let clamp = model.config.label_clamp();
    eprintln!(
        "Loaded model {:?}: {} features, trained metric {:.6}",
        model.name,
        index.len(),
        model.best_metric
    );

    let samples = util::read_samples_file(input, *limit)?;

    let mut accuracies = Vec::with_capacity(samples.len());
    let mut unknown_total = 0;
    for (i, sample) in samples.iter().enumerate() {
        let (indexed, unknown) = index.resolve_sample(sample);
        let predicted = scorer::predict(indexed.features(), weights.as_slice());
        let accuracy = metric::accuracy(predicted, clamp.apply(sample.label()));
        if *verbose {
            println!(
                "{:6}  label {:+10.2}  predicted {:+10.2}  accuracy {:.4}  unknown features {}",
                i + 1,
                sample.label(),
                predicted,
                accuracy,
                unknown
            );
        }
        unknown_total += unknown;
        accuracies.push(accuracy);
    }

    let Some(summary) = AccuracySummary::new(accuracies) else {
        anyhow::bail!("No samples to evaluate");
    };
    eprintln!();
    eprintln!("Accuracy over {} samples:", summary.count);
    eprintln!("  Min:    {:.4}", summary.min);
    eprintln!("  Max:    {:.4}", summary.max);
    eprintln!("  Mean:   {:.4}", summary.mean);
    eprintln!("  Median: {:.4}", summary.median);
    eprintln!("  Unknown features: {unknown_total}");

    Ok(())
}
