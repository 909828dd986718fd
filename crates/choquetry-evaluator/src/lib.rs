//! Discrete Choquet integral evaluation.
//!
//! This crate implements the ground-truth side of the weight-recovery
//! experiments: a piecewise-linear aggregation function over an input vector
//! and the pairwise minima/maxima of its components.
//!
//! # The Choquet function
//!
//! For an input `x` of dimension `d`, the evaluator computes
//!
//! ```text
//! f(x) = w·x + w_max·max_pairs(x) + w_min·min_pairs(x)
//! ```
//!
//! where `min_pairs(x)` and `max_pairs(x)` are the componentwise minimum and
//! maximum of every unordered pair of distinct components of `x`, enumerated
//! in a fixed canonical order (see [`pairing`]).
//!
//! # Design Principles
//!
//! - **Purity**: evaluation is deterministic and side-effect free. The same
//!   `(w, w_min, w_max)` and the same `x` always produce the same value.
//! - **Shape checking up front**: weight-vector shapes are validated once at
//!   construction; evaluation only has to check the input dimension.
//! - **Canonical pair order**: the pair enumeration is a free function shared
//!   by every evaluator instance, so `w_min[k]`/`w_max[k]` refer to the same
//!   component pair across all calls and all instances.

pub use self::choquet::{ChoquetFunction, ChoquetShapeError, DimensionMismatchError};

pub mod choquet;
pub mod pairing;
