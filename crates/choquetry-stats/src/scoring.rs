//! Prediction-vs-truth scoring.

/// Two sequences passed to a score differ in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("sequences have different lengths: {left} vs {right}")]
pub struct LengthMismatchError {
    /// Length of the first sequence.
    pub left: usize,
    /// Length of the second sequence.
    pub right: usize,
}

/// Sum of squared differences between two equal-length sequences.
///
/// Used for out-of-training evaluation: comparing ground-truth values against
/// model predictions, or a ground-truth weight vector against a recovered one.
/// Lower is better; identical sequences score `0.0`.
///
/// # Examples
///
/// ```
/// use choquetry_stats::scoring::sum_squared_error;
///
/// let score = sum_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]).unwrap();
/// assert_eq!(score, 1.0);
/// ```
pub fn sum_squared_error(truth: &[f64], predicted: &[f64]) -> Result<f64, LengthMismatchError> {
    if truth.len() != predicted.len() {
        return Err(LengthMismatchError {
            left: truth.len(),
            right: predicted.len(),
        });
    }
    Ok(std::iter::zip(truth, predicted)
        .map(|(t, p)| (p - t).powi(2))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_unit_difference() {
        let score = sum_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_identical_sequences_score_zero() {
        assert_eq!(sum_squared_error(&[0.5, 0.5], &[0.5, 0.5]).unwrap(), 0.0);
        assert_eq!(sum_squared_error(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_differences_accumulate() {
        let score = sum_squared_error(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert_eq!(score, 25.0);
    }

    #[test]
    fn test_length_mismatch() {
        let err = sum_squared_error(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(err, LengthMismatchError { left: 2, right: 1 });
    }
}
