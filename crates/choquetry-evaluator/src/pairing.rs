//! Canonical enumeration of unordered component pairs.
//!
//! The Choquet function attaches one `w_min` and one `w_max` weight to every
//! unordered pair of distinct input components. For those weights to be
//! meaningful the pair order must be fixed: index `k` of a pair-weight vector
//! always refers to the same component pair, for every evaluation and every
//! evaluator instance.
//!
//! The canonical order is lexicographic by `(i, j)` with `i < j`. For
//! dimension 4 the pairs are:
//!
//! ```text
//! (0,1) (0,2) (0,3) (1,2) (1,3) (2,3)
//! ```

/// Number of unordered pairs of distinct components for a given dimension:
/// `d · (d - 1) / 2`.
///
/// # Examples
///
/// ```
/// use choquetry_evaluator::pairing;
///
/// assert_eq!(pairing::pair_count(2), 1);
/// assert_eq!(pairing::pair_count(4), 6);
/// assert_eq!(pairing::pair_count(0), 0);
/// ```
#[must_use]
pub fn pair_count(dimension: usize) -> usize {
    dimension * dimension.saturating_sub(1) / 2
}

/// Iterates over all unordered index pairs `(i, j)` with `i < j` in canonical
/// (lexicographic) order.
pub fn index_pairs(dimension: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..dimension).flat_map(move |i| (i + 1..dimension).map(move |j| (i, j)))
}

/// Componentwise minimum of every canonical pair of `x`.
///
/// The result has length [`pair_count`]`(x.len())` and entry `k` is
/// `min(x[i], x[j])` for the `k`-th canonical pair.
#[must_use]
pub fn min_aggregates(x: &[f64]) -> Vec<f64> {
    index_pairs(x.len()).map(|(i, j)| x[i].min(x[j])).collect()
}

/// Componentwise maximum of every canonical pair of `x`.
#[must_use]
pub fn max_aggregates(x: &[f64]) -> Vec<f64> {
    index_pairs(x.len()).map(|(i, j)| x[i].max(x[j])).collect()
}
