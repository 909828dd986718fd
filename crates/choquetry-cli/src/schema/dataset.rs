use serde::{Deserialize, Serialize};

use choquetry_data::Dataset;

/// On-disk dataset format.
///
/// Exactly two top-level keys, `question` and `expected`, holding the full
/// (unsplit) dataset contents position-aligned: input `i` corresponds to
/// label `i`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct DatasetRecord {
    pub question: Vec<Vec<f64>>,
    pub expected: Vec<f64>,
}

impl From<&Dataset> for DatasetRecord {
    fn from(dataset: &Dataset) -> Self {
        Self {
            question: dataset.question().full().to_vec(),
            expected: dataset.expected().full().to_vec(),
        }
    }
}

impl DatasetRecord {
    /// Rebuilds a dataset with the recorded labels.
    pub(crate) fn into_dataset(self) -> Dataset {
        Dataset::from_labels(self.question, self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_two_top_level_keys() {
        let dataset = Dataset::from_function(vec![vec![1.0, 2.0]], |x| x[0]);
        let value = serde_json::to_value(DatasetRecord::from(&dataset)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("question"));
        assert!(object.contains_key("expected"));
    }

    #[test]
    fn test_roundtrip_preserves_alignment() {
        let dataset = Dataset::from_function(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            |x| x[0] + x[1],
        );
        let json = serde_json::to_string(&DatasetRecord::from(&dataset)).unwrap();
        let record: DatasetRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.into_dataset(), dataset);
    }
}
