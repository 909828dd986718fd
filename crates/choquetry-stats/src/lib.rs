//! Statistics utilities for experiment evaluation.
//!
//! - [`scoring`] - prediction-vs-truth scoring (sum of squared differences)
//! - [`descriptive`] - descriptive statistics for summarizing recovered
//!   weight distributions across repeated runs

pub mod descriptive;
pub mod scoring;
