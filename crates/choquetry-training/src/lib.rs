//! Weight recovery: fitting a constrained linear model to Choquet samples.
//!
//! This crate implements the training half of the system: given samples
//! labeled by a ground-truth Choquet function, fit a single linear unit and
//! read its weights back as an estimate of the function's component weights.
//!
//! # Architecture
//!
//! ```text
//! Experiment Runner (run_once / run_many)
//!     ↓ builds
//! LinearModel (SGD fit under a weight constraint)
//!     ↓ consumes
//! Dataset (choquetry-data) labeled by ChoquetFunction (choquetry-evaluator)
//! ```
//!
//! # Key Components
//!
//! - [`weights`] - weight vector initialization and L1 normalization
//! - [`constraint`] - max-norm and non-negativity constraint policies,
//!   enforced by projection after every gradient step
//! - [`loss`] - the four loss strategies; penalty-bearing variants read the
//!   live parameter snapshot, which is threaded explicitly rather than
//!   captured ambiently
//! - [`model`] - the trainable linear unit with an explicit
//!   `Untrained → Trained` state machine
//! - [`experiment`] - one-shot and repeated weight-recovery runs
//!
//! # Design Decisions
//!
//! ## Explicit two-state model API
//!
//! The model must be fitted before it predicts: [`model::LinearModel::predict`]
//! fails with `NotTrained` instead of silently fitting on first use. Callers
//! that want the forgiving behavior opt into
//! [`model::LinearModel::ensure_trained`].
//!
//! ## Composition over specialization
//!
//! There is one generic trainable-model type. What varies between experiment
//! families - dimension, label function, constraint policy, loss strategy -
//! is configuration ([`model::ModelConfig`], [`model::ModelBuilder`]), not a
//! type hierarchy.
//!
//! # Current Limitations
//!
//! - **Single linear unit only**: one layer, identity activation, optional
//!   bias. No multi-layer networks or non-linear activations.
//! - **Fixed optimizer**: SGD with momentum; the optimizer is not pluggable.
//! - **Fail-fast repetition batches**: an error in one repetition aborts the
//!   whole `run_many` batch.

pub mod constraint;
pub mod experiment;
pub mod loss;
pub mod model;
pub mod weights;
