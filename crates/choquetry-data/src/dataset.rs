//! Labeled datasets with position-synchronized train/test split views.
//!
//! A [`Dataset`] owns two parallel series: `question` (the input vectors) and
//! `expected` (the scalar labels). Both are split at the same index, so input
//! `i` always corresponds to label `i` in the full, training and testing
//! views alike. The split is positional: nothing is shuffled or re-ordered.
//!
//! # Lifecycle
//!
//! A dataset is created once per experiment, labeled eagerly at construction,
//! and mutated only through [`Dataset::split`]. Repeated calls to `split`
//! re-split from the full dataset, replacing the previous split.

use std::fmt;

/// Dataset construction or access failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DataError {
    /// Neither a label function nor a lookup table was supplied.
    #[display("dataset construction needs a label function or a lookup table")]
    MissingLabelSource,
    /// The dataset has no inputs.
    #[display("dataset has no inputs")]
    EmptyDataset,
}

/// An ordered series of values split at a single index into a training
/// prefix and a testing suffix.
///
/// Before the owning dataset is split, the whole series counts as training
/// and the testing view is empty. `training().len() + testing().len()` always
/// equals `full().len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSeries<T> {
    values: Vec<T>,
    split_at: usize,
}

impl<T> SplitSeries<T> {
    fn new(values: Vec<T>) -> Self {
        let split_at = values.len();
        Self { values, split_at }
    }

    /// The full, unsplit series.
    #[must_use]
    pub fn full(&self) -> &[T] {
        &self.values
    }

    /// Training prefix `[0, split_at)`.
    #[must_use]
    pub fn training(&self) -> &[T] {
        &self.values[..self.split_at]
    }

    /// Testing suffix `[split_at, len)`.
    #[must_use]
    pub fn testing(&self) -> &[T] {
        &self.values[self.split_at..]
    }

    /// Number of values in the full series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the full series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn split(&mut self, index: usize) {
        self.split_at = index.min(self.values.len());
    }
}

/// Inputs and labels with a shared, position-synchronized split.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    question: SplitSeries<Vec<f64>>,
    expected: SplitSeries<f64>,
}

impl Dataset {
    /// Creates a dataset by labeling each input with `label`.
    #[must_use]
    pub fn from_function<F>(inputs: Vec<Vec<f64>>, label: F) -> Self
    where
        F: Fn(&[f64]) -> f64,
    {
        let labels = inputs.iter().map(|x| label(x)).collect();
        Self {
            question: SplitSeries::new(inputs),
            expected: SplitSeries::new(labels),
        }
    }

    /// Creates a dataset with labels supplied directly.
    ///
    /// `labels` must be position-aligned with `inputs`.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` and `labels` have different lengths.
    #[must_use]
    pub fn from_labels(inputs: Vec<Vec<f64>>, labels: Vec<f64>) -> Self {
        assert_eq!(inputs.len(), labels.len());
        Self {
            question: SplitSeries::new(inputs),
            expected: SplitSeries::new(labels),
        }
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.question.len()
    }

    /// Whether the dataset has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question.is_empty()
    }

    /// Input dimension, derived from the first input vector.
    pub fn dimension(&self) -> Result<usize, DataError> {
        self.question
            .full()
            .first()
            .map(Vec::len)
            .ok_or(DataError::EmptyDataset)
    }

    /// Splits both series at index `floor(ratio · len)`.
    ///
    /// The training view becomes the prefix `[0, index)` and the testing view
    /// the suffix `[index, len)`. Calling `split` again re-splits from the
    /// full dataset; splits are never additive.
    pub fn split(&mut self, ratio: f64) {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        #[expect(clippy::cast_precision_loss)]
        let index = (ratio.clamp(0.0, 1.0) * self.len() as f64).floor() as usize;
        self.question.split(index);
        self.expected.split(index);
    }

    /// The input series.
    #[must_use]
    pub fn question(&self) -> &SplitSeries<Vec<f64>> {
        &self.question
    }

    /// The label series.
    #[must_use]
    pub fn expected(&self) -> &SplitSeries<f64> {
        &self.expected
    }
}

/// Builder assembling a [`Dataset`] from inputs plus one label source.
///
/// Exactly one of [`label_function`](Self::label_function) or
/// [`lookup_table`](Self::lookup_table) must be provided; [`build`](Self::build)
/// fails with [`DataError::MissingLabelSource`] otherwise. When both are set
/// the label function wins.
///
/// # Example
///
/// ```
/// use choquetry_data::DatasetBuilder;
///
/// let dataset = DatasetBuilder::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
///     .label_function(|x| x[0] + x[1])
///     .build()
///     .unwrap();
/// assert_eq!(dataset.expected().full(), [3.0, 7.0]);
/// ```
pub struct DatasetBuilder {
    inputs: Vec<Vec<f64>>,
    label_function: Option<Box<dyn Fn(&[f64]) -> f64>>,
    lookup: Option<Vec<(Vec<f64>, f64)>>,
}

impl fmt::Debug for DatasetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetBuilder")
            .field("inputs", &self.inputs.len())
            .field("label_function", &self.label_function.is_some())
            .field("lookup", &self.lookup.as_ref().map(Vec::len))
            .finish()
    }
}

impl DatasetBuilder {
    /// Starts a builder over the given inputs.
    #[must_use]
    pub fn new(inputs: Vec<Vec<f64>>) -> Self {
        Self {
            inputs,
            label_function: None,
            lookup: None,
        }
    }

    /// Labels each input by applying `label`.
    #[must_use]
    pub fn label_function<F>(mut self, label: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + 'static,
    {
        self.label_function = Some(Box::new(label));
        self
    }

    /// Labels each input by exact-match lookup, defaulting to `0.0` for
    /// inputs not present in the table.
    #[must_use]
    pub fn lookup_table(mut self, entries: Vec<(Vec<f64>, f64)>) -> Self {
        self.lookup = Some(entries);
        self
    }

    /// Builds the dataset, labeling every input.
    pub fn build(self) -> Result<Dataset, DataError> {
        if let Some(label) = self.label_function {
            return Ok(Dataset::from_function(self.inputs, label));
        }
        if let Some(entries) = self.lookup {
            let lookup = move |x: &[f64]| {
                entries
                    .iter()
                    .find(|(key, _)| key == x)
                    .map_or(0.0, |(_, value)| *value)
            };
            return Ok(Dataset::from_function(self.inputs, lookup));
        }
        Err(DataError::MissingLabelSource)
    }
}
