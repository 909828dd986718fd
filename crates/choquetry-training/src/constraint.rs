//! Weight constraint policies.
//!
//! A constraint is enforced continuously during fitting, not just at
//! initialization: after every gradient step the weight vector is projected
//! back into the feasible set. The constraint therefore never surfaces as a
//! user-facing error; the fitting procedure cannot produce an invalid weight
//! vector.

/// Rule enforced on model weights during fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightConstraint {
    /// Euclidean norm bounded by the given maximum. When the norm exceeds the
    /// bound, the whole vector is rescaled, preserving the sign of every
    /// weight (negative weights stay allowed).
    MaxNorm(f64),
    /// Every weight clamped to be non-negative.
    NonNegative,
}

impl Default for WeightConstraint {
    fn default() -> Self {
        Self::MaxNorm(1.0)
    }
}

impl WeightConstraint {
    /// Whether this constraint permits negative weights.
    #[must_use]
    pub fn allows_negative(self) -> bool {
        match self {
            Self::MaxNorm(_) => true,
            Self::NonNegative => false,
        }
    }

    /// Projects `weights` into the feasible set in-place.
    pub fn project(self, weights: &mut [f64]) {
        match self {
            Self::MaxNorm(limit) => {
                let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
                if norm > limit {
                    let scale = limit / norm;
                    for w in weights {
                        *w *= scale;
                    }
                }
            }
            Self::NonNegative => {
                for w in weights {
                    *w = w.max(0.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(weights: &[f64]) -> f64 {
        weights.iter().map(|w| w * w).sum::<f64>().sqrt()
    }

    #[test]
    fn test_max_norm_rescales_oversized_vectors() {
        let mut weights = vec![3.0, -4.0];
        WeightConstraint::MaxNorm(1.0).project(&mut weights);
        assert!((norm(&weights) - 1.0).abs() < 1e-12);
        // signs preserved, direction unchanged
        assert!((weights[0] - 0.6).abs() < 1e-12);
        assert!((weights[1] + 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_max_norm_leaves_feasible_vectors_alone() {
        let mut weights = vec![0.3, -0.4];
        WeightConstraint::MaxNorm(1.0).project(&mut weights);
        assert_eq!(weights, [0.3, -0.4]);
    }

    #[test]
    fn test_non_negative_clamps_at_zero() {
        let mut weights = vec![0.5, -0.25, 0.0];
        WeightConstraint::NonNegative.project(&mut weights);
        assert_eq!(weights, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_projection_is_idempotent() {
        for constraint in [WeightConstraint::MaxNorm(0.7), WeightConstraint::NonNegative] {
            let mut weights = vec![2.0, -1.5, 0.25];
            constraint.project(&mut weights);
            let once = weights.clone();
            constraint.project(&mut weights);
            assert_eq!(weights, once);
        }
    }
}
