//! One-sided Kolmogorov-Smirnov enrichment statistic.
//!
//! For a compound whose genes sit at the ascending 0-based ranks
//! `r_1 < r_2 < ... < r_k` of a list of length `N`, the statistic is
//!
//! ```text
//! ks = max(0, max_i (i/k - (r_i + 1)/N))      i = 1..k
//! ```
//!
//! i.e. the largest amount by which the empirical CDF of the compound's gene
//! positions runs ahead of the uniform CDF. Only deviations towards the top of
//! the list count, so gene sets concentrated among the most significant genes
//! score high and sets concentrated at the bottom score 0. The statistic lies
//! in `[0, 1 - k/N]`; the upper bound is reached exactly when the compound's
//! genes are the top `k` of the list.
//!
//! Observed and resampled statistics both go through [`ks_statistic`], so
//! bootstrap p-values compare like with like.

/// KS statistic for ranks that are already sorted ascending.
///
/// Returns 0 for an empty rank set, for `n == 0`, and whenever the gene set
/// covers the whole list (`k == n`), so the result is never NaN.
pub fn ks_statistic(ranks: &[usize], n: usize) -> f64 {
    let k = ranks.len();
    if k == 0 || n == 0 || k >= n {
        return 0.0;
    }

    debug_assert!(
        ranks.windows(2).all(|w| w[0] < w[1]),
        "ranks must be strictly ascending"
    );

    let k_f = k as f64;
    let n_f = n as f64;

    ranks
        .iter()
        .enumerate()
        .map(|(i, &r)| (i + 1) as f64 / k_f - (r + 1) as f64 / n_f)
        .fold(0.0_f64, f64::max)
}

/// KS statistic for distinct ranks in arbitrary order. Sorts a copy first.
///
/// Ranks must not repeat: `k` is the number of ranks passed in. Repeated
/// ranks trip the same debug assertion as in [`ks_statistic`].
pub fn ks_statistic_unsorted(ranks: &[usize], n: usize) -> f64 {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    ks_statistic(&sorted, n)
}

/// Largest value the statistic can take for `k` genes in a list of `n`.
pub fn ks_upper_bound(k: usize, n: usize) -> f64 {
    if k == 0 || n == 0 || k >= n {
        return 0.0;
    }
    1.0 - k as f64 / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_top_prefix_attains_maximum() {
        let ranks = vec![0, 1, 2];
        assert_relative_eq!(ks_statistic(&ranks, 10), 0.7, epsilon = 1e-12);
        assert_relative_eq!(ks_statistic(&ranks, 10), ks_upper_bound(3, 10), epsilon = 1e-12);
    }

    #[test]
    fn test_bottom_set_scores_zero() {
        let ranks = vec![7, 8, 9];
        assert_relative_eq!(ks_statistic(&ranks, 10), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shifting_down_decreases_statistic() {
        let n = 100;
        let k = 5;
        let mut previous = f64::INFINITY;
        for offset in 0..=(n - k) {
            let ranks: Vec<usize> = (offset..offset + k).collect();
            let ks = ks_statistic(&ranks, n);
            assert!(ks <= previous, "offset {} increased ks", offset);
            previous = ks;
        }
        assert_relative_eq!(previous, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_spreading_decreases_statistic() {
        let n = 1000;
        let top: Vec<usize> = (0..10).collect();
        let spread: Vec<usize> = (0..10).map(|i| i * 100 + 50).collect();
        assert!(ks_statistic(&top, n) > ks_statistic(&spread, n));
        assert!(ks_statistic(&spread, n) < 0.1);
    }

    #[test]
    fn test_full_list_is_degenerate() {
        let ranks: Vec<usize> = (0..10).collect();
        let ks = ks_statistic(&ranks, 10);
        assert!(!ks.is_nan());
        assert_eq!(ks, 0.0);
    }

    #[test]
    fn test_empty_ranks() {
        assert_eq!(ks_statistic(&[], 10), 0.0);
        assert_eq!(ks_statistic(&[1], 0), 0.0);
    }

    #[test]
    fn test_single_gene() {
        assert_relative_eq!(ks_statistic(&[0], 4), 0.75, epsilon = 1e-12);
        assert_relative_eq!(ks_statistic(&[3], 4), 0.0, epsilon = 1e-12);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "strictly ascending")]
    fn test_unsorted_rejects_repeated_ranks() {
        ks_statistic_unsorted(&[4, 1, 4], 20);
    }

    #[test]
    fn test_unsorted_matches_sorted() {
        let n = 50;
        let ranks = vec![12, 3, 40, 7];
        assert_eq!(ks_statistic_unsorted(&ranks, n), ks_statistic(&[3, 7, 12, 40], n));
    }
}
