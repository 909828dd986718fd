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
    schema::experiment::{ExperimentRecord, WeightStatsRecord},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunManyArg {
    #[command(flatten)]
    truth: GroundTruthArg,
    /// Number of independent repetitions
    #[arg(long, default_value_t = 10)]
    repetitions: usize,
    /// Number of synthetic samples to generate per repetition
    #[arg(long, default_value_t = 10_000)]
    samples: usize,
    /// Loss variant: abs, squared, absnorm or squarednorm
    #[arg(long, default_value = "abs")]
    loss: LossKind,
    /// Sort inputs lexicographically before training
    #[arg(long)]
    sort: bool,
    /// Number of training epochs per repetition
    #[arg(long, default_value_t = 1)]
    epochs: usize,
    /// Suppress per-repetition progress output
    #[arg(long)]
    quiet: bool,
    /// Experiment seed (32 hex characters); random when omitted
    #[arg(long)]
    seed: Option<ExperimentSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RunManyArg) -> anyhow::Result<()> {
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
    let quiet = arg.quiet;
    let runs = experiment::run_many(
        &choquet,
        arg.repetitions,
        arg.loss,
        &config,
        &mut rng,
        |completed, total| {
            if !quiet {
                eprintln!("{completed} / {total}");
            }
        },
    )?;

    let stats = experiment::weight_component_stats(&runs);
    if let Some(stats) = &stats {
        eprintln!("Recovered weight components across {} runs:", runs.len());
        eprintln!(
            "  Min:  {:.4?}",
            stats.iter().map(|s| s.min).collect::<Vec<_>>()
        );
        eprintln!(
            "  Max:  {:.4?}",
            stats.iter().map(|s| s.max).collect::<Vec<_>>()
        );
        eprintln!(
            "  Mean: {:.4?}",
            stats.iter().map(|s| s.mean).collect::<Vec<_>>()
        );

        let mean: Vec<f64> = stats.iter().map(|s| s.mean).collect();
        let score = scoring::sum_squared_error(&normalized_truth, &mean)?;
        eprintln!("Sum of squared error of mean recovery: {score:.6}");
    }

    let record = ExperimentRecord {
        name: "run-many".to_owned(),
        ran_at: Utc::now(),
        seed,
        loss: arg.loss.to_string(),
        sample_size: arg.samples,
        sorted: arg.sort,
        epochs: arg.epochs,
        ground_truth: choquet,
        normalized_ground_truth: normalized_truth,
        runs,
        weight_stats: stats
            .map(|stats| stats.iter().map(WeightStatsRecord::from).collect()),
    };
    Output::save_json(&record, arg.output.clone())?;

    Ok(())
}
