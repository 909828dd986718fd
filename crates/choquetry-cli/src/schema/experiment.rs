use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use choquetry_data::ExperimentSeed;
use choquetry_evaluator::ChoquetFunction;
use choquetry_stats::descriptive::DescriptiveStats;

/// Saved result of a weight-recovery experiment.
///
/// Records everything needed to replay the run: the seed, the ground truth,
/// and the experiment parameters, along with the recovered weight vectors
/// (one per repetition, each L1-normalized) and their per-component spread.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct ExperimentRecord {
    pub name: String,
    pub ran_at: DateTime<Utc>,
    pub seed: ExperimentSeed,
    pub loss: String,
    pub sample_size: usize,
    pub sorted: bool,
    pub epochs: usize,
    pub ground_truth: ChoquetFunction,
    pub normalized_ground_truth: Vec<f64>,
    pub runs: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_stats: Option<Vec<WeightStatsRecord>>,
}

/// Per-component summary of recovered weights across repetitions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct WeightStatsRecord {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl From<&DescriptiveStats> for WeightStatsRecord {
    fn from(stats: &DescriptiveStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
        }
    }
}
