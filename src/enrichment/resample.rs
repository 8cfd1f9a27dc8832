//! Null distributions for the KS statistic.
//!
//! Every resample draws from its own `StdRng`, seeded from the master seed,
//! a stream id and the resample index. A resample can
//! therefore be recomputed in isolation, and exceedance counts do not depend
//! on the order in which resamples run or on how they are split across
//! threads.
//!
//! * [`ResampleMode::Compound`]: the stream id is the FNV-1a hash of the
//!   compound name. Each resample draws `k` distinct positions of the gene
//!   list uniformly without replacement.
//! * [`ResampleMode::List`]: all compounds share one stream. Resample `b`
//!   builds a single random permutation of the list positions and applies it
//!   to every compound, the same as shuffling the input gene list once per
//!   resample.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use super::ks::ks_statistic;
use super::utils::{derive_seed, fnv1a_64};
use super::{ResampleMode, ResolvedCompound};

const LIST_STREAM: u64 = 0x6c69_7374_5f70_6572;

/// Bootstrap p-value with +1 smoothing: `(1 + exceedances) / (B + 1)`.
pub fn bootstrap_p_value(exceedances: usize, resamples: usize) -> f64 {
    (exceedances + 1) as f64 / (resamples + 1) as f64
}

#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    mode: ResampleMode,
    resamples: usize,
    seed: u64,
    n_genes: usize,
}

impl Resampler {
    pub fn new(mode: ResampleMode, resamples: usize, seed: u64, n_genes: usize) -> Self {
        Resampler {
            mode,
            resamples,
            seed,
            n_genes,
        }
    }

    pub fn mode(&self) -> ResampleMode {
        self.mode
    }

    pub fn resamples(&self) -> usize {
        self.resamples
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random stream a compound draws from: its name hash in compound mode,
    /// the shared list stream in list mode.
    pub fn stream_id(&self, compound: &str) -> u64 {
        match self.mode {
            ResampleMode::Compound => fnv1a_64(compound.as_bytes()),
            ResampleMode::List => LIST_STREAM,
        }
    }

    /// Seed of resample `index` on `stream`.
    pub fn resample_seed(&self, stream: u64, index: usize) -> u64 {
        derive_seed(self.seed, stream, index as u64)
    }

    fn rng(&self, stream: u64, index: usize) -> StdRng {
        StdRng::seed_from_u64(self.resample_seed(stream, index))
    }

    /// Positions of `k` genes drawn without replacement from the list, sorted.
    pub fn random_ranks(&self, compound: &str, k: usize, index: usize) -> Vec<usize> {
        let mut rng = self.rng(fnv1a_64(compound.as_bytes()), index);
        let mut ranks =
            rand::seq::index::sample(&mut rng, self.n_genes, k.min(self.n_genes)).into_vec();
        ranks.sort_unstable();
        ranks
    }

    /// Permutation used by list resample `index`: `perm[r]` is the new rank of
    /// the gene originally at rank `r`.
    pub fn permutation(&self, index: usize) -> Vec<usize> {
        let mut rng = self.rng(LIST_STREAM, index);
        let mut perm: Vec<usize> = (0..self.n_genes).collect();
        perm.shuffle(&mut rng);
        perm
    }

    /// Null statistic of resample `index` for one compound.
    pub fn null_statistic(&self, compound: &str, ranks: &[usize], index: usize) -> f64 {
        match self.mode {
            ResampleMode::Compound => {
                let drawn = self.random_ranks(compound, ranks.len(), index);
                ks_statistic(&drawn, self.n_genes)
            }
            ResampleMode::List => {
                let perm = self.permutation(index);
                let permuted = apply_permutation(&perm, ranks);
                ks_statistic(&permuted, self.n_genes)
            }
        }
    }

    /// All `B` null statistics for one compound, in resample-index order.
    pub fn null_statistics(&self, compound: &str, ranks: &[usize]) -> Vec<f64> {
        (0..self.resamples)
            .map(|b| self.null_statistic(compound, ranks, b))
            .collect()
    }

    /// Number of compound-mode resamples whose statistic reaches `observed`.
    pub fn compound_exceedances(&self, compound: &str, ranks: &[usize], observed: f64) -> usize {
        let k = ranks.len();
        (0..self.resamples)
            .filter(|&b| {
                let drawn = self.random_ranks(compound, k, b);
                ks_statistic(&drawn, self.n_genes) >= observed
            })
            .count()
    }

    /// Exceedance counts for every compound under list resampling.
    ///
    /// Resamples run in parallel; each one builds its permutation once and
    /// scores every compound against it. Counts are summed, so the result is
    /// independent of scheduling.
    pub(crate) fn list_exceedances(&self, compounds: &[ResolvedCompound]) -> Vec<usize> {
        let m = compounds.len();
        if m == 0 {
            return Vec::new();
        }

        (0..self.resamples)
            .into_par_iter()
            .fold(
                || vec![0usize; m],
                |mut counts, b| {
                    let perm = self.permutation(b);
                    let mut permuted = Vec::new();
                    for (count, compound) in counts.iter_mut().zip(compounds) {
                        permuted.clear();
                        permuted.extend(compound.ranks.iter().map(|&r| perm[r]));
                        permuted.sort_unstable();
                        if ks_statistic(&permuted, self.n_genes) >= compound.ks {
                            *count += 1;
                        }
                    }
                    counts
                },
            )
            .reduce(
                || vec![0usize; m],
                |mut a, b| {
                    a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                    a
                },
            )
    }
}

fn apply_permutation(perm: &[usize], ranks: &[usize]) -> Vec<usize> {
    let mut permuted: Vec<usize> = ranks.iter().map(|&r| perm[r]).collect();
    permuted.sort_unstable();
    permuted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn compound(name: &str, ranks: Vec<usize>, n: usize) -> ResolvedCompound {
        let ks = ks_statistic(&ranks, n);
        ResolvedCompound {
            name: name.to_string(),
            ranks,
            ks,
        }
    }

    #[test]
    fn test_bootstrap_p_value_smoothing() {
        assert_relative_eq!(bootstrap_p_value(0, 999), 0.001, epsilon = 1e-12);
        assert_relative_eq!(bootstrap_p_value(999, 999), 1.0, epsilon = 1e-12);
        assert!(bootstrap_p_value(0, 1) > 0.0);
    }

    #[test]
    fn test_random_ranks_are_distinct_and_in_range() {
        let resampler = Resampler::new(ResampleMode::Compound, 10, 7, 50);
        for b in 0..10 {
            let ranks = resampler.random_ranks("drugA", 12, b);
            assert_eq!(ranks.len(), 12);
            assert!(ranks.windows(2).all(|w| w[0] < w[1]));
            assert!(ranks.iter().all(|&r| r < 50));
        }
    }

    #[test]
    fn test_stream_ids_follow_mode() {
        let compound = Resampler::new(ResampleMode::Compound, 1, 3, 10);
        assert_ne!(compound.stream_id("drugA"), compound.stream_id("drugB"));

        let list = Resampler::new(ResampleMode::List, 1, 3, 10);
        assert_eq!(list.stream_id("drugA"), list.stream_id("drugB"));
        assert_ne!(list.resample_seed(LIST_STREAM, 0), list.resample_seed(LIST_STREAM, 1));
    }

    #[test]
    fn test_permutation_is_bijection() {
        let resampler = Resampler::new(ResampleMode::List, 5, 11, 30);
        let mut perm = resampler.permutation(3);
        perm.sort_unstable();
        assert_eq!(perm, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_null() {
        let a = Resampler::new(ResampleMode::Compound, 50, 42, 200);
        let b = Resampler::new(ResampleMode::Compound, 50, 42, 200);
        let ranks = vec![0, 5, 17, 90];
        assert_eq!(a.null_statistics("x", &ranks), b.null_statistics("x", &ranks));

        let c = Resampler::new(ResampleMode::Compound, 50, 43, 200);
        assert_ne!(a.null_statistics("x", &ranks), c.null_statistics("x", &ranks));
    }

    #[test]
    fn test_compound_streams_differ_by_name() {
        let resampler = Resampler::new(ResampleMode::Compound, 1, 42, 1000);
        assert_ne!(
            resampler.random_ranks("drugA", 10, 0),
            resampler.random_ranks("drugB", 10, 0)
        );
    }

    #[test]
    fn test_execution_order_does_not_matter() {
        let n = 100;
        let ranks = vec![1, 3, 8, 20];
        let observed = ks_statistic(&ranks, n);
        let resampler = Resampler::new(ResampleMode::Compound, 200, 99, n);

        let forward = resampler.compound_exceedances("drugA", &ranks, observed);
        let reverse = (0..200)
            .rev()
            .filter(|&b| resampler.null_statistic("drugA", &ranks, b) >= observed)
            .count();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_list_exceedances_match_per_compound_nulls() {
        let n = 40;
        let compounds = vec![compound("a", vec![0, 1, 2], n), compound("b", vec![10, 25, 39], n)];
        let resampler = Resampler::new(ResampleMode::List, 64, 5, n);

        let counts = resampler.list_exceedances(&compounds);
        for (c, count) in compounds.iter().zip(&counts) {
            let expected = resampler
                .null_statistics(&c.name, &c.ranks)
                .into_iter()
                .filter(|&s| s >= c.ks)
                .count();
            assert_eq!(*count, expected);
        }
    }

    #[test]
    fn test_list_exceedances_empty() {
        let resampler = Resampler::new(ResampleMode::List, 10, 1, 10);
        assert!(resampler.list_exceedances(&[]).is_empty());
    }
}
