use std::path::PathBuf;

use chrono::Utc;
use rand::Rng as _;

use choquetry_data::ExperimentSeed;
use choquetry_stats::scoring;
use choquetry_training::{
    experiment::{self, ExperimentConfig},
    loss::LossKind,
    weights,
};

use crate::{
    command::GroundTruthArg,
    schema::{dataset::DatasetRecord, experiment::ExperimentRecord},
    util::{Output, read_json_file},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunOnceArg {
    #[command(flatten)]
    truth: GroundTruthArg,
    /// Number of synthetic samples to generate
    #[arg(long, default_value_t = 10_000)]
    samples: usize,
    /// Fit on a previously saved dataset instead of generating one
    #[arg(long, conflicts_with_all = ["samples", "sort"])]
    data_file: Option<PathBuf>,
    /// Loss variant: abs, squared, absnorm or squarednorm
    #[arg(long, default_value = "abs")]
    loss: LossKind,
    /// Sort inputs lexicographically before training
    #[arg(long)]
    sort: bool,
    /// Number of training epochs
    #[arg(long, default_value_t = 1)]
    epochs: usize,
    /// Experiment seed (32 hex characters); random when omitted
    #[arg(long)]
    seed: Option<ExperimentSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RunOnceArg) -> anyhow::Result<()> {
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = seed.rng();
    let choquet = arg.truth.resolve(&mut rng)?;

    let mut normalized_truth = choquet.component_weights().to_vec();
    weights::normalize_l1(&mut normalized_truth);

    eprintln!("Seed: {seed}");
    eprintln!("Ground truth (normalized): {normalized_truth:.4?}");

    let config = ExperimentConfig {
        sample_size: arg.samples,
        sort_inputs: arg.sort,
        epochs: arg.epochs,
        ..ExperimentConfig::default()
    };
    let (recovered, sample_size) = match &arg.data_file {
        Some(path) => {
            let record: DatasetRecord = read_json_file("dataset", path)?;
            let dataset = record.into_dataset();
            let sample_size = dataset.len();
            (
                experiment::run_once_on(dataset, arg.loss, &config, &mut rng)?,
                sample_size,
            )
        }
        None => (
            experiment::run_once(&choquet, arg.loss, &config, &mut rng)?,
            arg.samples,
        ),
    };
    let score = scoring::sum_squared_error(&normalized_truth, &recovered)?;

    eprintln!("Recovered weights:         {recovered:.4?}");
    eprintln!("Sum of squared error:      {score:.6}");

    let record = ExperimentRecord {
        name: "run-once".to_owned(),
        ran_at: Utc::now(),
        seed,
        loss: arg.loss.to_string(),
        sample_size,
        sorted: arg.sort,
        epochs: arg.epochs,
        ground_truth: choquet,
        normalized_ground_truth: normalized_truth,
        runs: vec![recovered],
        weight_stats: None,
    };
    Output::save_json(&record, arg.output.clone())?;

    Ok(())
}
