//! Kolmogorov-Smirnov drug repositioning.
//!
//! Given a gene list ordered by decreasing significance and a database of
//! compound-gene interactions, each compound is scored by how strongly its
//! interacting genes cluster at the top of the list, and the score is judged
//! against a resampled null distribution.
//!
//! ## Pipeline
//!
//! - **[`RankIndex`]** (`rank`): gene symbol to list position
//! - **[`ks_statistic`]** (`ks`): one-sided KS enrichment statistic
//! - **[`Resampler`]** (`resample`): compound or list resampling, bootstrap p-values
//! - **[`ks_repo`]** (`aggregate`): per-compound driver, correction and sorting
//!
//! ## Quick Example
//!
//! ```rust
//! use ksrepo::enrichment::{ks_repo, InteractionDatabase, KsRepoConfig};
//!
//! let genes: Vec<String> = (1..=10).map(|i| format!("g{}", i)).collect();
//! let db = InteractionDatabase::from_pairs(vec![
//!     ("drugA", vec!["g1", "g2", "g3"]),
//!     ("drugB", vec!["g8", "g9", "g10"]),
//! ])
//! .unwrap();
//!
//! let results = ks_repo(&genes, &db, &KsRepoConfig::default().with_seed(1)).unwrap();
//! assert_eq!(results.rows()[0].compound, "drugA");
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{KsRepoError, Result};
use crate::testing::CorrectionMethod;

mod aggregate;
mod ks;
mod rank;
mod resample;
pub(crate) mod utils;

pub use aggregate::ks_repo;
pub use ks::{ks_statistic, ks_statistic_unsorted, ks_upper_bound};
pub use rank::RankIndex;
pub use resample::{Resampler, bootstrap_p_value};

pub const DEFAULT_RESAMPLES: usize = 1000;

/// How the null distribution is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleMode {
    /// Replace the compound's genes by `k` random genes of the list.
    #[default]
    Compound,
    /// Keep the gene set, randomly permute the gene list.
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KsRepoConfig {
    /// Number of resamples (B)
    pub resamples: usize,
    pub mode: ResampleMode,
    /// Master seed; `None` draws one from OS entropy
    pub seed: Option<u64>,
    pub correction: CorrectionMethod,
    /// Size of a dedicated thread pool; `None` uses the global rayon pool
    pub threads: Option<usize>,
}

impl Default for KsRepoConfig {
    fn default() -> Self {
        KsRepoConfig {
            resamples: DEFAULT_RESAMPLES,
            mode: ResampleMode::Compound,
            seed: None,
            correction: CorrectionMethod::BenjaminiHochberg,
            threads: None,
        }
    }
}

impl KsRepoConfig {
    pub fn with_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    pub fn with_mode(mut self, mode: ResampleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_correction(mut self, correction: CorrectionMethod) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.resamples == 0 {
            return Err(KsRepoError::InvalidConfig(
                "resample count must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(KsRepoError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        self.correction.validate()
    }
}

/// Compound to interacting-gene-set mapping. Compounds iterate in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionDatabase {
    compounds: BTreeMap<String, BTreeSet<String>>,
}

impl InteractionDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(compound, genes)` pairs. Repeated compounds merge their
    /// gene sets.
    pub fn from_pairs<C, G, I>(pairs: impl IntoIterator<Item = (C, I)>) -> Result<Self>
    where
        C: Into<String>,
        G: Into<String>,
        I: IntoIterator<Item = G>,
    {
        let mut db = Self::new();
        for (compound, genes) in pairs {
            db.insert(compound, genes)?;
        }
        Ok(db)
    }

    /// Add genes to a compound. An empty gene set is rejected.
    pub fn insert<C, G, I>(&mut self, compound: C, genes: I) -> Result<()>
    where
        C: Into<String>,
        G: Into<String>,
        I: IntoIterator<Item = G>,
    {
        let compound = compound.into();
        let genes: BTreeSet<String> = genes.into_iter().map(Into::into).collect();
        if genes.is_empty() {
            return Err(KsRepoError::EmptyGeneSet { compound });
        }
        self.compounds.entry(compound).or_default().extend(genes);
        Ok(())
    }

    pub fn get(&self, compound: &str) -> Option<&BTreeSet<String>> {
        self.compounds.get(compound)
    }

    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.compounds.iter()
    }

    /// Every distinct gene that interacts with at least one compound.
    pub fn universe(&self) -> BTreeSet<&str> {
        self.compounds
            .values()
            .flat_map(|genes| genes.iter().map(String::as_str))
            .collect()
    }
}

impl<'a> IntoIterator for &'a InteractionDatabase {
    type Item = (&'a String, &'a BTreeSet<String>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, BTreeSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.compounds.iter()
    }
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundResult {
    pub compound: String,
    /// Genes of the compound found in the gene list
    #[serde(rename = "n.genes")]
    pub n_genes: usize,
    pub ks: f64,
    #[serde(rename = "boot.p")]
    pub boot_p: f64,
    #[serde(rename = "boot.fdr")]
    pub boot_fdr: f64,
}

/// Result table, sorted by ascending `boot_fdr`, then ascending `boot_p`,
/// descending `ks` and compound name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KsRepoResults {
    rows: Vec<CompoundResult>,
}

impl KsRepoResults {
    pub(crate) fn new(rows: Vec<CompoundResult>) -> Self {
        KsRepoResults { rows }
    }

    pub fn rows(&self) -> &[CompoundResult] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<CompoundResult> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, compound: &str) -> Option<&CompoundResult> {
        self.rows.iter().find(|r| r.compound == compound)
    }

    /// Rows with `boot_fdr < alpha`.
    pub fn significant(&self, alpha: f64) -> Vec<&CompoundResult> {
        self.rows.iter().filter(|r| r.boot_fdr < alpha).collect()
    }

    pub fn top(&self, n: usize) -> &[CompoundResult] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// A compound with at least one gene in the list, ready for resampling.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedCompound {
    pub name: String,
    pub ranks: Vec<usize>,
    pub ks: f64,
}
