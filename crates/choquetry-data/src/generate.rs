//! Synthetic input generation.

use std::ops::Range;

use rand::Rng;

/// Generates random input vectors with independently uniform components.
///
/// Every component is drawn from the half-open `range`, which defaults to
/// `0.0..1.0`. The generator keeps no state between calls; reproducibility is
/// the caller's responsibility via the `rng` argument (see
/// [`ExperimentSeed`](crate::ExperimentSeed)).
#[derive(Debug, Clone, PartialEq)]
pub struct InputGenerator {
    range: Range<f64>,
}

impl Default for InputGenerator {
    fn default() -> Self {
        Self { range: 0.0..1.0 }
    }
}

impl InputGenerator {
    /// Creates a generator drawing components uniformly from `range`.
    #[must_use]
    pub fn new(range: Range<f64>) -> Self {
        Self { range }
    }

    /// Component range of this generator.
    #[must_use]
    pub fn range(&self) -> &Range<f64> {
        &self.range
    }

    /// Generates `count` vectors of `dimension` uniform components.
    pub fn generate<R>(&self, rng: &mut R, dimension: usize, count: usize) -> Vec<Vec<f64>>
    where
        R: Rng + ?Sized,
    {
        (0..count)
            .map(|_| {
                (0..dimension)
                    .map(|_| rng.random_range(self.range.clone()))
                    .collect()
            })
            .collect()
    }
}

/// Sorts input vectors lexicographically (componentwise `total_cmp`).
///
/// Sorting changes only the order data is seen during fitting; because
/// dataset splits are positional, it also changes which samples land in the
/// training prefix versus the testing suffix.
pub fn sort_inputs(inputs: &mut [Vec<f64>]) {
    inputs.sort_by(|a, b| {
        a.iter()
            .zip(b)
            .map(|(x, y)| x.total_cmp(y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rng() -> impl Rng {
        crate::ExperimentSeed::from_bytes([42u8; 16]).rng()
    }

    #[test]
    fn test_generates_requested_shape() {
        let mut rng = test_rng();
        let inputs = InputGenerator::default().generate(&mut rng, 3, 10);
        assert_eq!(inputs.len(), 10);
        assert!(inputs.iter().all(|x| x.len() == 3));
    }

    #[test]
    fn test_components_stay_in_range() {
        let mut rng = test_rng();
        let generator = InputGenerator::new(-2.0..2.0);
        let inputs = generator.generate(&mut rng, 4, 100);
        assert!(inputs
            .iter()
            .flatten()
            .all(|&v| (-2.0..2.0).contains(&v)));
    }

    #[test]
    fn test_default_range_is_unit_interval() {
        let mut rng = test_rng();
        let inputs = InputGenerator::default().generate(&mut rng, 2, 100);
        assert!(inputs.iter().flatten().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_sort_is_lexicographic() {
        let mut inputs = vec![
            vec![0.5, 0.1],
            vec![0.1, 0.9],
            vec![0.1, 0.2],
            vec![0.5, 0.0],
        ];
        sort_inputs(&mut inputs);
        assert_eq!(
            inputs,
            [
                vec![0.1, 0.2],
                vec![0.1, 0.9],
                vec![0.5, 0.0],
                vec![0.5, 0.1],
            ]
        );
    }
}
