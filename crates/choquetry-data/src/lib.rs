//! Synthetic data pipeline for weight-recovery experiments.
//!
//! This crate covers everything between "a ground-truth function exists" and
//! "a model can be fitted":
//!
//! - [`seed`] - a 128-bit experiment seed with hex serde, the only source of
//!   randomness in the system
//! - [`generate`] - uniform random input vectors of a fixed dimension
//! - [`dataset`] - labeled inputs with position-synchronized question/expected
//!   split views
//!
//! # Reproducibility
//!
//! No function in this crate touches global random state. Generation takes an
//! explicit `&mut R where R: Rng + ?Sized`; running the same seed through
//! [`ExperimentSeed::rng`] reproduces an experiment exactly.

pub use self::{
    dataset::{DataError, Dataset, DatasetBuilder, SplitSeries},
    generate::{InputGenerator, sort_inputs},
    seed::ExperimentSeed,
};

pub mod dataset;
pub mod generate;
pub mod seed;
