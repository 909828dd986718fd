//! The trainable linear model.
//!
//! A [`LinearModel`] is a single linear unit `predict(x) = w·x (+ bias)` with
//! identity activation, fitted by stochastic gradient descent with momentum.
//! The configured [`WeightConstraint`] is enforced by projection after every
//! gradient step, so the model can never expose an infeasible weight vector.
//!
//! # State machine
//!
//! `Untrained → Trained`, with no backward transition. [`LinearModel::fit`]
//! is a full refit, not incremental: it reinitializes the weights, clears the
//! history and repopulates it epoch by epoch. Calling `fit` again on a
//! trained model refits from scratch, overwriting weights and history.
//!
//! Prediction before fitting fails with [`TrainError::NotTrained`] instead of
//! silently fitting on first use; callers that want the forgiving behavior
//! opt into [`LinearModel::ensure_trained`].

use std::{collections::BTreeMap, fmt, iter};

use rand::Rng;

use choquetry_data::{Dataset, InputGenerator, sort_inputs};

use crate::{constraint::WeightConstraint, loss::LossFunction, weights};

/// Training or prediction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TrainError {
    /// Model construction was given neither a dataset nor a generation spec.
    #[display("model construction needs a dataset or a generation spec")]
    MissingDataSource,
    /// An input vector length disagrees with the model dimension.
    #[display("input has {got} components, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    /// Fitting was requested with zero training samples.
    #[display("training requires at least one sample")]
    EmptyDataset,
    /// `predict` was called before `fit`.
    #[display("model is not trained; call fit or ensure_trained first")]
    NotTrained,
}

/// Hyperparameters of the linear unit and its optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    /// Whether to fit a scalar bias alongside the weights.
    pub use_bias: bool,
    /// Constraint projected onto the weights after every gradient step.
    pub constraint: WeightConstraint,
    /// SGD learning rate.
    pub learning_rate: f64,
    /// SGD momentum coefficient.
    pub momentum: f64,
    /// Scale of the random weight initialization.
    pub init_scale: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            use_bias: false,
            constraint: WeightConstraint::default(),
            learning_rate: 0.01,
            momentum: 0.9,
            init_scale: 0.05,
        }
    }
}

/// Options for one call to [`LinearModel::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Fraction of the dataset used as the training prefix when validating.
    pub split_ratio: f64,
    /// Whether to hold out a testing suffix and report `val_loss` per epoch.
    /// When false the model fits on the entire dataset.
    pub validate: bool,
    /// Number of passes over the training data.
    pub epochs: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            split_ratio: 0.5,
            validate: true,
            epochs: 1,
        }
    }
}

/// A single trainable linear unit with an optional bias.
#[derive(Debug)]
pub struct LinearModel {
    dimension: usize,
    weights: Vec<f64>,
    bias: Option<f64>,
    loss: Box<dyn LossFunction>,
    config: ModelConfig,
    trained: bool,
    history: BTreeMap<String, Vec<f64>>,
}

impl LinearModel {
    /// Creates an untrained model of the given dimension.
    ///
    /// Weights start at zero and are randomly reinitialized by every call to
    /// [`fit`](Self::fit).
    #[must_use]
    pub fn new(dimension: usize, loss: Box<dyn LossFunction>, config: ModelConfig) -> Self {
        Self {
            dimension,
            weights: vec![0.0; dimension],
            bias: config.use_bias.then_some(0.0),
            loss,
            config,
            trained: false,
            history: BTreeMap::new(),
        }
    }

    /// Input dimension this model expects.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The learned weight vector, exactly as fitted.
    ///
    /// Callers wanting a probability-like view must normalize themselves
    /// (see [`weights::normalize_l1`]); the model never normalizes.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The learned bias, if the model was configured with one.
    #[must_use]
    pub fn bias(&self) -> Option<f64> {
        self.bias
    }

    /// Whether the model has been fitted.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Per-epoch metric history of the most recent fit, keyed by metric name
    /// (`"loss"`, and `"val_loss"` when validating).
    #[must_use]
    pub fn history(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.history
    }

    fn forward(&self, x: &[f64]) -> f64 {
        let dot: f64 = iter::zip(&self.weights, x).map(|(w, v)| w * v).sum();
        dot + self.bias.unwrap_or(0.0)
    }

    /// Model output for `x`.
    ///
    /// Fails with [`TrainError::NotTrained`] before the first fit and with
    /// [`TrainError::DimensionMismatch`] on a wrong-length input.
    pub fn predict(&self, x: &[f64]) -> Result<f64, TrainError> {
        if !self.trained {
            return Err(TrainError::NotTrained);
        }
        self.check_dimension(x)?;
        Ok(self.forward(x))
    }

    /// Runs a default fit if the model is untrained; does nothing otherwise.
    pub fn ensure_trained<R>(&mut self, dataset: &mut Dataset, rng: &mut R) -> Result<(), TrainError>
    where
        R: Rng + ?Sized,
    {
        if self.trained {
            return Ok(());
        }
        self.fit(dataset, FitOptions::default(), rng)
    }

    /// Fits the model to `dataset` from scratch.
    ///
    /// With `options.validate` the dataset is split positionally at
    /// `options.split_ratio` and the held-out suffix is scored after every
    /// epoch; without it the model fits on the full dataset.
    ///
    /// Reinitializes the weights, replaces the metric history, and leaves the
    /// model in the trained state. The weight constraint is projected after
    /// every gradient step.
    pub fn fit<R>(
        &mut self,
        dataset: &mut Dataset,
        options: FitOptions,
        rng: &mut R,
    ) -> Result<(), TrainError>
    where
        R: Rng + ?Sized,
    {
        let data_dimension = dataset
            .dimension()
            .map_err(|_| TrainError::EmptyDataset)?;
        if data_dimension != self.dimension {
            return Err(TrainError::DimensionMismatch {
                expected: self.dimension,
                got: data_dimension,
            });
        }

        if options.validate {
            dataset.split(options.split_ratio);
        }
        let (inputs, labels) = if options.validate {
            (dataset.question().training(), dataset.expected().training())
        } else {
            (dataset.question().full(), dataset.expected().full())
        };
        if inputs.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        for x in inputs {
            self.check_dimension(x)?;
        }

        let ModelConfig {
            constraint,
            learning_rate,
            momentum,
            init_scale,
            ..
        } = self.config;

        // full refit: fresh weights, fresh history
        self.weights = if constraint.allows_negative() {
            weights::random_signed(rng, init_scale, self.dimension)
        } else {
            weights::random(rng, init_scale, self.dimension)
        };
        constraint.project(&mut self.weights);
        if let Some(bias) = self.bias.as_mut() {
            *bias = 0.0;
        }
        self.history.clear();

        let mut velocity = vec![0.0; self.dimension];
        let mut bias_velocity = 0.0;
        let mut epoch_losses = Vec::with_capacity(options.epochs);
        let mut epoch_val_losses = Vec::with_capacity(options.epochs);

        for _epoch in 0..options.epochs {
            let mut loss_sum = 0.0;
            for (x, label) in iter::zip(inputs, labels) {
                let prediction = self.forward(x);
                loss_sum += self.loss.value(prediction, *label, &self.weights);

                let prediction_grad = self.loss.prediction_grad(prediction, *label);
                for i in 0..self.dimension {
                    let grad =
                        prediction_grad * x[i] + self.loss.weight_grad(&self.weights, i);
                    velocity[i] = momentum * velocity[i] - learning_rate * grad;
                }
                for i in 0..self.dimension {
                    self.weights[i] += velocity[i];
                }
                if let Some(bias) = self.bias.as_mut() {
                    bias_velocity = momentum * bias_velocity - learning_rate * prediction_grad;
                    *bias += bias_velocity;
                }
                constraint.project(&mut self.weights);
            }
            #[expect(clippy::cast_precision_loss)]
            epoch_losses.push(loss_sum / inputs.len() as f64);

            if options.validate && !dataset.question().testing().is_empty() {
                epoch_val_losses.push(self.held_out_loss(dataset));
            }
        }

        self.history.insert("loss".to_owned(), epoch_losses);
        if !epoch_val_losses.is_empty() {
            self.history.insert("val_loss".to_owned(), epoch_val_losses);
        }
        self.trained = true;
        Ok(())
    }

    fn held_out_loss(&self, dataset: &Dataset) -> f64 {
        let inputs = dataset.question().testing();
        let labels = dataset.expected().testing();
        let sum: f64 = iter::zip(inputs, labels)
            .map(|(x, label)| self.loss.value(self.forward(x), *label, &self.weights))
            .sum();
        #[expect(clippy::cast_precision_loss)]
        let mean = sum / inputs.len() as f64;
        mean
    }

    fn check_dimension(&self, x: &[f64]) -> Result<(), TrainError> {
        if x.len() == self.dimension {
            Ok(())
        } else {
            Err(TrainError::DimensionMismatch {
                expected: self.dimension,
                got: x.len(),
            })
        }
    }
}

struct GenerationSpec<'a> {
    dimension: usize,
    sample_size: usize,
    sort: bool,
    label: Box<dyn Fn(&[f64]) -> f64 + 'a>,
}

/// Builds a [`LinearModel`] together with the dataset it will fit.
///
/// The data comes from exactly one of two sources: an existing
/// [`Dataset`] ([`dataset`](Self::dataset)) or a generation spec of
/// dimension, sample count and label function
/// ([`generate`](Self::generate)). [`build`](Self::build) fails with
/// [`TrainError::MissingDataSource`] when neither was supplied.
pub struct ModelBuilder<'a> {
    loss: Box<dyn LossFunction>,
    config: ModelConfig,
    generator: InputGenerator,
    dataset: Option<Dataset>,
    generation: Option<GenerationSpec<'a>>,
}

impl fmt::Debug for ModelBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("loss", &self.loss)
            .field("config", &self.config)
            .field("generator", &self.generator)
            .field("dataset", &self.dataset.as_ref().map(Dataset::len))
            .field("generation", &self.generation.is_some())
            .finish()
    }
}

impl<'a> ModelBuilder<'a> {
    /// Starts a builder with the given loss strategy and default
    /// configuration.
    #[must_use]
    pub fn new(loss: Box<dyn LossFunction>) -> Self {
        Self {
            loss,
            config: ModelConfig::default(),
            generator: InputGenerator::default(),
            dataset: None,
            generation: None,
        }
    }

    /// Sets the model configuration.
    #[must_use]
    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the input generator used by [`generate`](Self::generate).
    #[must_use]
    pub fn generator(mut self, generator: InputGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Uses an existing dataset.
    #[must_use]
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Generates a fresh dataset at build time: `sample_size` random inputs
    /// of `dimension` components, optionally sorted lexicographically before
    /// labeling with `label`.
    #[must_use]
    pub fn generate<F>(mut self, dimension: usize, sample_size: usize, sort: bool, label: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + 'a,
    {
        self.generation = Some(GenerationSpec {
            dimension,
            sample_size,
            sort,
            label: Box::new(label),
        });
        self
    }

    /// Builds the model and its dataset.
    pub fn build<R>(self, rng: &mut R) -> Result<(LinearModel, Dataset), TrainError>
    where
        R: Rng + ?Sized,
    {
        if let Some(dataset) = self.dataset {
            let dimension = dataset
                .dimension()
                .map_err(|_| TrainError::EmptyDataset)?;
            return Ok((LinearModel::new(dimension, self.loss, self.config), dataset));
        }
        if let Some(spec) = self.generation {
            let mut inputs = self
                .generator
                .generate(rng, spec.dimension, spec.sample_size);
            if spec.sort {
                sort_inputs(&mut inputs);
            }
            let dataset = Dataset::from_function(inputs, spec.label);
            return Ok((
                LinearModel::new(spec.dimension, self.loss, self.config),
                dataset,
            ));
        }
        Err(TrainError::MissingDataSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use choquetry_data::ExperimentSeed;

    use crate::loss::{AbsoluteLoss, SquaredLoss};

    fn test_rng(tag: u8) -> impl Rng {
        ExperimentSeed::from_bytes([tag; 16]).rng()
    }

    fn additive_dataset(rng: &mut impl Rng, count: usize) -> Dataset {
        let inputs = InputGenerator::default().generate(rng, 2, count);
        Dataset::from_function(inputs, |x| 0.3 * x[0] + 0.7 * x[1])
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = LinearModel::new(2, Box::new(SquaredLoss::new()), ModelConfig::default());
        assert_eq!(model.predict(&[0.5, 0.5]).unwrap_err(), TrainError::NotTrained);
    }

    #[test]
    fn test_ensure_trained_fits_once() {
        let mut rng = test_rng(1);
        let mut dataset = additive_dataset(&mut rng, 40);
        let mut model =
            LinearModel::new(2, Box::new(SquaredLoss::new()), ModelConfig::default());
        assert!(!model.is_trained());
        model.ensure_trained(&mut dataset, &mut rng).unwrap();
        assert!(model.is_trained());

        // a second call must not refit
        let weights = model.weights().to_vec();
        model.ensure_trained(&mut dataset, &mut rng).unwrap();
        assert_eq!(model.weights(), weights);
    }

    #[test]
    fn test_fit_recovers_additive_weights() {
        let mut rng = test_rng(2);
        let mut dataset = additive_dataset(&mut rng, 200);
        let mut model =
            LinearModel::new(2, Box::new(SquaredLoss::new()), ModelConfig::default());
        model
            .fit(
                &mut dataset,
                FitOptions {
                    split_ratio: 0.5,
                    validate: false,
                    epochs: 50,
                },
                &mut rng,
            )
            .unwrap();

        assert!((model.weights()[0] - 0.3).abs() < 0.1);
        assert!((model.weights()[1] - 0.7).abs() < 0.1);

        let prediction = model.predict(&[1.0, 0.0]).unwrap();
        assert!((prediction - 0.3).abs() < 0.15);
    }

    #[test]
    fn test_non_negative_constraint_holds_throughout() {
        let mut rng = test_rng(3);
        let inputs = InputGenerator::default().generate(&mut rng, 2, 100);
        // labels pull the second weight negative
        let mut dataset = Dataset::from_function(inputs, |x| 0.5 * x[0] - 0.5 * x[1]);
        let mut model = LinearModel::new(
            2,
            Box::new(SquaredLoss::new()),
            ModelConfig {
                constraint: WeightConstraint::NonNegative,
                ..ModelConfig::default()
            },
        );
        model
            .fit(
                &mut dataset,
                FitOptions {
                    validate: false,
                    epochs: 10,
                    ..FitOptions::default()
                },
                &mut rng,
            )
            .unwrap();
        assert!(model.weights().iter().all(|&w| w >= 0.0));
    }

    #[test]
    fn test_history_tracks_epochs_and_refit_overwrites() {
        let mut rng = test_rng(4);
        let mut dataset = additive_dataset(&mut rng, 40);
        let mut model =
            LinearModel::new(2, Box::new(AbsoluteLoss::new()), ModelConfig::default());

        let validate = FitOptions {
            split_ratio: 0.5,
            validate: true,
            epochs: 2,
        };
        model.fit(&mut dataset, validate, &mut rng).unwrap();
        assert_eq!(model.history()["loss"].len(), 2);
        assert_eq!(model.history()["val_loss"].len(), 2);

        let refit = FitOptions {
            validate: false,
            epochs: 3,
            ..FitOptions::default()
        };
        model.fit(&mut dataset, refit, &mut rng).unwrap();
        assert_eq!(model.history()["loss"].len(), 3);
        assert!(!model.history().contains_key("val_loss"));
    }

    #[test]
    fn test_dimension_mismatch_on_predict_and_fit() {
        let mut rng = test_rng(5);
        let mut dataset = additive_dataset(&mut rng, 20);
        let mut model =
            LinearModel::new(3, Box::new(SquaredLoss::new()), ModelConfig::default());
        assert_eq!(
            model.fit(&mut dataset, FitOptions::default(), &mut rng),
            Err(TrainError::DimensionMismatch { expected: 3, got: 2 })
        );

        let mut model =
            LinearModel::new(2, Box::new(SquaredLoss::new()), ModelConfig::default());
        model
            .fit(
                &mut dataset,
                FitOptions {
                    validate: false,
                    ..FitOptions::default()
                },
                &mut rng,
            )
            .unwrap();
        assert_eq!(
            model.predict(&[1.0]).unwrap_err(),
            TrainError::DimensionMismatch { expected: 2, got: 1 }
        );
    }

    #[test]
    fn test_fit_on_empty_dataset_fails() {
        let mut rng = test_rng(6);
        let mut dataset = Dataset::from_function(vec![], |x| x[0]);
        let mut model =
            LinearModel::new(2, Box::new(SquaredLoss::new()), ModelConfig::default());
        assert_eq!(
            model.fit(&mut dataset, FitOptions::default(), &mut rng),
            Err(TrainError::EmptyDataset)
        );
    }

    mod builder {
        use super::*;

        #[test]
        fn test_missing_data_source() {
            let mut rng = test_rng(7);
            let err = ModelBuilder::new(Box::new(SquaredLoss::new()))
                .build(&mut rng)
                .unwrap_err();
            assert_eq!(err, TrainError::MissingDataSource);
        }

        #[test]
        fn test_generation_spec_builds_labeled_dataset() {
            let mut rng = test_rng(8);
            let (model, dataset) = ModelBuilder::new(Box::new(SquaredLoss::new()))
                .generate(3, 50, false, |x| x.iter().sum())
                .build(&mut rng)
                .unwrap();
            assert_eq!(model.dimension(), 3);
            assert_eq!(dataset.len(), 50);
            let x = &dataset.question().full()[0];
            let sum: f64 = x.iter().sum();
            assert_eq!(dataset.expected().full()[0], sum);
        }

        #[test]
        fn test_sorted_generation() {
            let mut rng = test_rng(9);
            let (_, dataset) = ModelBuilder::new(Box::new(SquaredLoss::new()))
                .generate(2, 30, true, |x| x[0])
                .build(&mut rng)
                .unwrap();
            let inputs = dataset.question().full();
            assert!(inputs.windows(2).all(|w| w[0][0] <= w[1][0]));
        }

        #[test]
        fn test_existing_dataset_sets_dimension() {
            let mut rng = test_rng(10);
            let dataset = additive_dataset(&mut rng, 10);
            let (model, dataset) = ModelBuilder::new(Box::new(SquaredLoss::new()))
                .dataset(dataset)
                .build(&mut rng)
                .unwrap();
            assert_eq!(model.dimension(), 2);
            assert_eq!(dataset.len(), 10);
        }
    }
}
