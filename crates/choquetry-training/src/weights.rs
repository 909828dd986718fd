//! Weight vector initialization and normalization.
//!
//! Utility functions shared by model initialization and by experiment
//! post-processing. Normalization divides a vector by its own sum so entries
//! sum to 1.0, making recovered weights comparable against the ground truth
//! regardless of the scale the fit converged to.

use rand::Rng;
use rand_distr::Normal;

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use choquetry_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f64 + 1.0), 3);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates a random weight vector with components uniform in
/// `[0.0, max_weight]`.
///
/// Used to initialize non-negative models, where a signed start would just be
/// clamped away by the first projection.
pub fn random<R>(rng: &mut R, max_weight: f64, len: usize) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(0.0..=max_weight), len)
}

/// Generates a random weight vector with components drawn from
/// `N(0, sigma²)`.
///
/// Used to initialize sign-preserving (max-norm constrained) models.
pub fn random_signed<R>(rng: &mut R, sigma: f64, len: usize) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).expect("sigma must be finite and non-negative");
    from_fn(|_| rng.sample(normal), len)
}

/// Normalizes a weight vector to sum to 1.0 (L1 normalization).
///
/// Recovered weights are compared against ground truth as distributions, so
/// every entry is divided by the vector's own sum. If the sum is zero or
/// negative the weights are left unchanged (to avoid division by zero and
/// sign flips). Normalizing an already-normalized vector is a no-op up to
/// floating-point rounding.
pub fn normalize_l1(weights: &mut [f64]) {
    let sum: f64 = weights.iter().copied().sum();
    if sum > 0.0 {
        for w in weights {
            *w /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sums_to_one() {
        let mut weights = vec![1.0, 2.0, 3.0, 4.0];
        normalize_l1(&mut weights);
        let sum: f64 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(weights[3], 0.4);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut weights = vec![0.2, 0.3, 0.5];
        let before = weights.clone();
        normalize_l1(&mut weights);
        for (b, a) in std::iter::zip(&before, &weights) {
            assert!((b - a).abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalize_skips_non_positive_sum() {
        let mut weights = vec![0.5, -0.5];
        normalize_l1(&mut weights);
        assert_eq!(weights, [0.5, -0.5]);

        let mut weights = vec![-1.0, -2.0];
        normalize_l1(&mut weights);
        assert_eq!(weights, [-1.0, -2.0]);
    }

    #[test]
    fn test_random_stays_in_bounds() {
        let mut rng = rand::rng();
        let weights = random(&mut rng, 0.5, 100);
        assert_eq!(weights.len(), 100);
        assert!(weights.iter().all(|&w| (0.0..=0.5).contains(&w)));
    }

    #[test]
    fn test_random_signed_produces_both_signs() {
        let mut rng = rand::rng();
        let weights = random_signed(&mut rng, 1.0, 200);
        assert!(weights.iter().any(|&w| w > 0.0));
        assert!(weights.iter().any(|&w| w < 0.0));
    }
}
