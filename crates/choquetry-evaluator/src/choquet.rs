//! The Choquet function: three weight vectors and a pure evaluation rule.

use std::iter;

use serde::{Deserialize, Serialize};

use crate::pairing;

/// Input vector length disagrees with the evaluator dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("input has {got} components, evaluator expects {expected}")]
pub struct DimensionMismatchError {
    /// Dimension the evaluator was constructed with.
    pub expected: usize,
    /// Length of the offending input vector.
    pub got: usize,
}

/// Weight vectors passed at construction have inconsistent shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ChoquetShapeError {
    /// `w_min` does not have one entry per canonical component pair.
    #[display("w_min has length {got}, expected {expected} for dimension {dimension}")]
    MinWeightLength {
        dimension: usize,
        expected: usize,
        got: usize,
    },
    /// `w_max` does not have one entry per canonical component pair.
    #[display("w_max has length {got}, expected {expected} for dimension {dimension}")]
    MaxWeightLength {
        dimension: usize,
        expected: usize,
        got: usize,
    },
}

/// A discrete Choquet integral, parameterized by three weight vectors.
///
/// `w` weighs the raw input components, `w_min` and `w_max` weigh the
/// pairwise minima and maxima of the components (one entry per canonical
/// pair, see [`pairing::index_pairs`]). The function is immutable after
/// construction.
///
/// # Example
///
/// ```
/// use choquetry_evaluator::ChoquetFunction;
///
/// // Plain weighted mean: no pair interaction.
/// let f = ChoquetFunction::new(vec![0.5, 0.5], vec![0.0], vec![0.0]).unwrap();
/// assert_eq!(f.evaluate(&[1.0, 3.0]).unwrap(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChoquetWeights")]
pub struct ChoquetFunction {
    w: Vec<f64>,
    w_min: Vec<f64>,
    w_max: Vec<f64>,
}

/// Raw weight triple used to validate deserialized functions.
#[derive(Debug, Deserialize)]
struct ChoquetWeights {
    w: Vec<f64>,
    w_min: Vec<f64>,
    w_max: Vec<f64>,
}

impl TryFrom<ChoquetWeights> for ChoquetFunction {
    type Error = ChoquetShapeError;

    fn try_from(raw: ChoquetWeights) -> Result<Self, Self::Error> {
        Self::new(raw.w, raw.w_min, raw.w_max)
    }
}

impl ChoquetFunction {
    /// Creates a Choquet function from its three weight vectors.
    ///
    /// The dimension `d` is `w.len()`; `w_min` and `w_max` must each have
    /// `d · (d - 1) / 2` entries, one per canonical component pair.
    pub fn new(
        w: Vec<f64>,
        w_min: Vec<f64>,
        w_max: Vec<f64>,
    ) -> Result<Self, ChoquetShapeError> {
        let dimension = w.len();
        let expected = pairing::pair_count(dimension);
        if w_min.len() != expected {
            return Err(ChoquetShapeError::MinWeightLength {
                dimension,
                expected,
                got: w_min.len(),
            });
        }
        if w_max.len() != expected {
            return Err(ChoquetShapeError::MaxWeightLength {
                dimension,
                expected,
                got: w_max.len(),
            });
        }
        Ok(Self { w, w_min, w_max })
    }

    /// Like [`Self::new`], but with zero pair weights: a plain weighted sum.
    #[must_use]
    pub fn additive(w: Vec<f64>) -> Self {
        let pairs = pairing::pair_count(w.len());
        Self {
            w,
            w_min: vec![0.0; pairs],
            w_max: vec![0.0; pairs],
        }
    }

    /// Input dimension this function evaluates.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.w.len()
    }

    /// Component weights `w`.
    #[must_use]
    pub fn component_weights(&self) -> &[f64] {
        &self.w
    }

    /// Pair-minimum weights `w_min`.
    #[must_use]
    pub fn min_weights(&self) -> &[f64] {
        &self.w_min
    }

    /// Pair-maximum weights `w_max`.
    #[must_use]
    pub fn max_weights(&self) -> &[f64] {
        &self.w_max
    }

    /// Evaluates the function at `x`.
    ///
    /// Computes `w·x + w_max·max_pairs(x) + w_min·min_pairs(x)`. Pure and
    /// deterministic; the only failure mode is a wrong input length.
    pub fn evaluate(&self, x: &[f64]) -> Result<f64, DimensionMismatchError> {
        if x.len() != self.w.len() {
            return Err(DimensionMismatchError {
                expected: self.w.len(),
                got: x.len(),
            });
        }
        let component_term = dot(&self.w, x.iter().copied());
        let max_term = dot(&self.w_max, pairing::max_aggregates(x));
        let min_term = dot(&self.w_min, pairing::min_aggregates(x));
        Ok(component_term + max_term + min_term)
    }
}

fn dot<I>(weights: &[f64], values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    iter::zip(weights, values).map(|(w, v)| w * v).sum()
}
