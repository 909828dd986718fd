//! Weight-recovery experiments: one-shot and repeated runs.
//!
//! An experiment builds a fresh synthetic dataset from a ground-truth
//! [`ChoquetFunction`], fits a [`LinearModel`](crate::model::LinearModel)
//! under the configured loss and constraint, and returns the fitted weights
//! L1-normalized (sum 1.0) so recovered distributions are comparable across
//! runs and against the ground truth.
//!
//! Repeated runs are fully independent: every repetition generates its own
//! data and fits its own model, sharing nothing but the rng stream. The
//! batch fails fast - an error in one repetition aborts the remaining ones.
//!
//! Core code never prints; per-repetition progress is reported through a
//! callback so drivers can render it however they like.

use rand::Rng;

use choquetry_data::Dataset;
use choquetry_evaluator::ChoquetFunction;
use choquetry_stats::descriptive::DescriptiveStats;

use crate::{
    loss::LossKind,
    model::{FitOptions, LinearModel, ModelBuilder, ModelConfig, TrainError},
    weights,
};

/// Parameters of a single weight-recovery run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Number of synthetic samples to generate per run.
    pub sample_size: usize,
    /// Sort inputs lexicographically before training. Splits are positional,
    /// so sorting changes which samples land in train vs. test.
    pub sort_inputs: bool,
    /// Train/test split ratio passed to the fit.
    pub split_ratio: f64,
    /// Number of training epochs per run.
    pub epochs: usize,
    /// Model and optimizer configuration.
    pub model: ModelConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sample_size: 10_000,
            sort_inputs: false,
            split_ratio: 0.5,
            epochs: 1,
            model: ModelConfig::default(),
        }
    }
}

/// Runs one weight-recovery experiment.
///
/// Generates `config.sample_size` inputs of the evaluator's dimension,
/// labels them through `choquet`, fits a linear model with the given loss,
/// and returns the fitted weights normalized to sum to 1.
pub fn run_once<R>(
    choquet: &ChoquetFunction,
    loss: LossKind,
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<Vec<f64>, TrainError>
where
    R: Rng + ?Sized,
{
    let (mut model, mut dataset) = ModelBuilder::new(loss.build())
        .config(config.model)
        .generate(
            choquet.dimension(),
            config.sample_size,
            config.sort_inputs,
            |x| {
                choquet
                    .evaluate(x)
                    .expect("generated inputs match the evaluator dimension")
            },
        )
        .build(rng)?;

    fit_and_recover(&mut model, &mut dataset, config, rng)
}

/// Runs one weight-recovery experiment on an existing dataset.
///
/// Same fit and normalization as [`run_once`], but over `dataset` (for
/// example one replayed from a saved file) instead of freshly generated
/// inputs. `config.sample_size` and `config.sort_inputs` are ignored; the
/// dataset is taken as-is.
pub fn run_once_on<R>(
    dataset: Dataset,
    loss: LossKind,
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<Vec<f64>, TrainError>
where
    R: Rng + ?Sized,
{
    let (mut model, mut dataset) = ModelBuilder::new(loss.build())
        .config(config.model)
        .dataset(dataset)
        .build(rng)?;
    fit_and_recover(&mut model, &mut dataset, config, rng)
}

fn fit_and_recover<R>(
    model: &mut LinearModel,
    dataset: &mut Dataset,
    config: &ExperimentConfig,
    rng: &mut R,
) -> Result<Vec<f64>, TrainError>
where
    R: Rng + ?Sized,
{
    model.fit(
        dataset,
        FitOptions {
            split_ratio: config.split_ratio,
            validate: true,
            epochs: config.epochs,
        },
        rng,
    )?;

    let mut recovered = model.weights().to_vec();
    weights::normalize_l1(&mut recovered);
    Ok(recovered)
}

/// Runs `repetitions` independent weight-recovery experiments.
///
/// Each repetition draws fresh data and fits a fresh model; `progress` is
/// called with `(completed, repetitions)` before each run starts. The first
/// failing repetition aborts the batch.
pub fn run_many<R, P>(
    choquet: &ChoquetFunction,
    repetitions: usize,
    loss: LossKind,
    config: &ExperimentConfig,
    rng: &mut R,
    mut progress: P,
) -> Result<Vec<Vec<f64>>, TrainError>
where
    R: Rng + ?Sized,
    P: FnMut(usize, usize),
{
    let mut runs = Vec::with_capacity(repetitions);
    for completed in 0..repetitions {
        progress(completed, repetitions);
        runs.push(run_once(choquet, loss, config, rng)?);
    }
    Ok(runs)
}

/// Per-component statistics of recovered weights across repetitions.
///
/// Transposes `runs` (one normalized weight vector per repetition) into one
/// [`DescriptiveStats`] per weight component, for analyzing how stable the
/// recovery is. Returns `None` when `runs` is empty.
///
/// # Panics
///
/// Panics if the vectors in `runs` do not all have the same length.
#[must_use]
pub fn weight_component_stats(runs: &[Vec<f64>]) -> Option<Vec<DescriptiveStats>> {
    let dimension = runs.first()?.len();
    assert!(runs.iter().all(|run| run.len() == dimension));
    Some(
        (0..dimension)
            .map(|i| DescriptiveStats::new(runs.iter().map(|run| run[i])).unwrap())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use choquetry_data::{ExperimentSeed, InputGenerator};

    fn test_rng(tag: u8) -> impl Rng {
        ExperimentSeed::from_bytes([tag; 16]).rng()
    }

    fn half_half() -> ChoquetFunction {
        ChoquetFunction::new(vec![0.5, 0.5], vec![0.0], vec![0.0]).unwrap()
    }

    #[test]
    fn test_run_once_returns_normalized_weights() {
        let mut rng = test_rng(11);
        let config = ExperimentConfig {
            sample_size: 100,
            epochs: 5,
            ..ExperimentConfig::default()
        };
        let recovered = run_once(&half_half(), LossKind::Abs, &config, &mut rng).unwrap();
        assert_eq!(recovered.len(), 2);
        let sum: f64 = recovered.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_run_once_recovers_additive_truth() {
        let mut rng = test_rng(12);
        let truth = ChoquetFunction::new(vec![0.2, 0.8], vec![0.0], vec![0.0]).unwrap();
        let config = ExperimentConfig {
            sample_size: 400,
            epochs: 30,
            ..ExperimentConfig::default()
        };
        let recovered = run_once(&truth, LossKind::Squared, &config, &mut rng).unwrap();
        assert!((recovered[0] - 0.2).abs() < 0.1);
        assert!((recovered[1] - 0.8).abs() < 0.1);
    }

    #[test]
    fn test_run_once_on_existing_dataset() {
        let mut rng = test_rng(15);
        let inputs = InputGenerator::default().generate(&mut rng, 2, 400);
        let dataset = Dataset::from_function(inputs, |x| 0.2 * x[0] + 0.8 * x[1]);
        let config = ExperimentConfig {
            epochs: 30,
            ..ExperimentConfig::default()
        };
        let recovered =
            run_once_on(dataset, LossKind::Squared, &config, &mut rng).unwrap();
        assert_eq!(recovered.len(), 2);
        let sum: f64 = recovered.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((recovered[0] - 0.2).abs() < 0.1);
        assert!((recovered[1] - 0.8).abs() < 0.1);
    }

    #[test]
    fn test_run_many_is_independent_per_repetition() {
        let mut rng = test_rng(13);
        let config = ExperimentConfig {
            sample_size: 60,
            epochs: 3,
            ..ExperimentConfig::default()
        };
        let runs =
            run_many(&half_half(), 4, LossKind::Squared, &config, &mut rng, |_, _| {}).unwrap();
        assert_eq!(runs.len(), 4);
        assert!(runs.iter().all(|run| run.len() == 2));
        // fresh data per run: repetitions are not identical
        assert!(runs.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_run_many_reports_progress() {
        let mut rng = test_rng(14);
        let config = ExperimentConfig {
            sample_size: 40,
            epochs: 1,
            ..ExperimentConfig::default()
        };
        let mut seen = Vec::new();
        run_many(&half_half(), 3, LossKind::Abs, &config, &mut rng, |done, total| {
            seen.push((done, total));
        })
        .unwrap();
        assert_eq!(seen, [(0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_component_stats_transpose() {
        let runs = vec![vec![0.4, 0.6], vec![0.6, 0.4], vec![0.5, 0.5]];
        let stats = weight_component_stats(&runs).unwrap();
        assert_eq!(stats.len(), 2);
        assert!((stats[0].mean - 0.5).abs() < 1e-12);
        assert_eq!(stats[0].min, 0.4);
        assert_eq!(stats[1].max, 0.6);
    }

    #[test]
    fn test_component_stats_empty_runs() {
        assert!(weight_component_stats(&[]).is_none());
    }
}
