//! Loss strategies for fitting.
//!
//! Four variants are supported: absolute difference, squared difference, and
//! each of those plus a weight-sum-deviation penalty `|1 - Σ wᵢ|`. The
//! penalty term reads the model's in-progress weights, so a loss is a
//! capability over `(prediction, label, parameter snapshot)` - the snapshot
//! is threaded explicitly instead of being captured ambiently by a closure.
//!
//! For gradient descent a loss exposes two partial derivatives:
//!
//! - [`LossFunction::prediction_grad`] - `∂loss/∂prediction`, which the model
//!   chains through `∂prediction/∂wᵢ = xᵢ`
//! - [`LossFunction::weight_grad`] - `∂loss/∂wᵢ` of terms that read the
//!   parameter snapshot directly (zero for the unpenalized variants)
//!
//! The absolute-value terms use the subgradient convention that the gradient
//! at zero is zero.

use std::fmt;

/// A per-sample loss over `(prediction, label, parameter snapshot)`.
pub trait LossFunction: fmt::Debug + Send + Sync {
    /// Loss value for one sample given the live weight snapshot.
    fn value(&self, prediction: f64, label: f64, weights: &[f64]) -> f64;

    /// `∂loss/∂prediction`.
    fn prediction_grad(&self, prediction: f64, label: f64) -> f64;

    /// `∂loss/∂weights[index]` of snapshot-reading terms. Zero unless the
    /// loss couples to the parameters directly.
    fn weight_grad(&self, weights: &[f64], index: usize) -> f64 {
        let _ = (weights, index);
        0.0
    }
}

/// Sign with the subgradient convention `sign(0) = 0`.
fn subgradient_sign(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v.signum() }
}

fn sum_deviation_value(weights: &[f64]) -> f64 {
    (1.0 - weights.iter().sum::<f64>()).abs()
}

fn sum_deviation_grad(weights: &[f64]) -> f64 {
    // d|1 - Σw|/dwᵢ = -sign(1 - Σw), identical for every component
    -subgradient_sign(1.0 - weights.iter().sum::<f64>())
}

/// Absolute difference `|label - prediction|`, optionally plus the
/// weight-sum-deviation penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteLoss {
    sum_penalty: bool,
}

impl AbsoluteLoss {
    /// Plain absolute difference.
    #[must_use]
    pub fn new() -> Self {
        Self { sum_penalty: false }
    }

    /// Absolute difference plus `|1 - Σ wᵢ|`.
    #[must_use]
    pub fn with_sum_penalty() -> Self {
        Self { sum_penalty: true }
    }
}

impl LossFunction for AbsoluteLoss {
    fn value(&self, prediction: f64, label: f64, weights: &[f64]) -> f64 {
        let base = (label - prediction).abs();
        if self.sum_penalty {
            base + sum_deviation_value(weights)
        } else {
            base
        }
    }

    fn prediction_grad(&self, prediction: f64, label: f64) -> f64 {
        subgradient_sign(prediction - label)
    }

    fn weight_grad(&self, weights: &[f64], _index: usize) -> f64 {
        if self.sum_penalty {
            sum_deviation_grad(weights)
        } else {
            0.0
        }
    }
}

/// Squared difference `(label - prediction)²`, optionally plus the
/// weight-sum-deviation penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredLoss {
    sum_penalty: bool,
}

impl SquaredLoss {
    /// Plain squared difference.
    #[must_use]
    pub fn new() -> Self {
        Self { sum_penalty: false }
    }

    /// Squared difference plus `|1 - Σ wᵢ|`.
    #[must_use]
    pub fn with_sum_penalty() -> Self {
        Self { sum_penalty: true }
    }
}

impl LossFunction for SquaredLoss {
    fn value(&self, prediction: f64, label: f64, weights: &[f64]) -> f64 {
        let base = (label - prediction).powi(2);
        if self.sum_penalty {
            base + sum_deviation_value(weights)
        } else {
            base
        }
    }

    fn prediction_grad(&self, prediction: f64, label: f64) -> f64 {
        2.0 * (prediction - label)
    }

    fn weight_grad(&self, weights: &[f64], _index: usize) -> f64 {
        if self.sum_penalty {
            sum_deviation_grad(weights)
        } else {
            0.0
        }
    }
}

/// Selectable loss variant, for CLI flags and saved experiment records.
///
/// Parses case-insensitively from the variant name: `abs`, `squared`,
/// `absnorm`, `squarednorm`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum LossKind {
    /// Absolute difference.
    #[default]
    Abs,
    /// Squared difference.
    Squared,
    /// Absolute difference plus weight-sum-deviation penalty.
    AbsNorm,
    /// Squared difference plus weight-sum-deviation penalty.
    SquaredNorm,
}

impl LossKind {
    /// Builds the loss strategy for this variant.
    #[must_use]
    pub fn build(self) -> Box<dyn LossFunction> {
        match self {
            Self::Abs => Box::new(AbsoluteLoss::new()),
            Self::Squared => Box::new(SquaredLoss::new()),
            Self::AbsNorm => Box::new(AbsoluteLoss::with_sum_penalty()),
            Self::SquaredNorm => Box::new(SquaredLoss::with_sum_penalty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_WEIGHTS: &[f64] = &[];

    #[test]
    fn test_absolute_value_and_grad() {
        let loss = AbsoluteLoss::new();
        assert_eq!(loss.value(2.0, 5.0, NO_WEIGHTS), 3.0);
        assert_eq!(loss.prediction_grad(2.0, 5.0), -1.0);
        assert_eq!(loss.prediction_grad(5.0, 2.0), 1.0);
        assert_eq!(loss.prediction_grad(2.0, 2.0), 0.0);
        assert_eq!(loss.weight_grad(&[0.1, 0.2], 0), 0.0);
    }

    #[test]
    fn test_squared_value_and_grad() {
        let loss = SquaredLoss::new();
        assert_eq!(loss.value(2.0, 5.0, NO_WEIGHTS), 9.0);
        assert_eq!(loss.prediction_grad(2.0, 5.0), -6.0);
    }

    #[test]
    fn test_sum_penalty_couples_to_weight_snapshot() {
        let loss = AbsoluteLoss::with_sum_penalty();
        // weights sum to 0.5, so the penalty contributes |1 - 0.5| = 0.5
        assert_eq!(loss.value(2.0, 2.0, &[0.25, 0.25]), 0.5);
        // weights already sum to 1: no penalty
        assert_eq!(loss.value(2.0, 2.0, &[0.4, 0.6]), 0.0);

        // penalty gradient pushes the sum toward 1
        assert_eq!(loss.weight_grad(&[0.25, 0.25], 0), -1.0);
        assert_eq!(loss.weight_grad(&[0.75, 0.75], 1), 1.0);
        assert_eq!(loss.weight_grad(&[0.4, 0.6], 0), 0.0);
    }

    #[test]
    fn test_squared_penalty_variant() {
        let loss = SquaredLoss::with_sum_penalty();
        assert_eq!(loss.value(1.0, 3.0, &[0.5, 0.0]), 4.0 + 0.5);
        assert_eq!(loss.weight_grad(&[0.5, 0.0], 1), -1.0);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("abs".parse::<LossKind>().unwrap(), LossKind::Abs);
        assert_eq!("squared".parse::<LossKind>().unwrap(), LossKind::Squared);
        assert_eq!("absnorm".parse::<LossKind>().unwrap(), LossKind::AbsNorm);
        assert_eq!(
            "squarednorm".parse::<LossKind>().unwrap(),
            LossKind::SquaredNorm
        );
        assert!("mean".parse::<LossKind>().is_err());
    }
}
