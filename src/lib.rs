//! # ksrepo
//!
//! Kolmogorov-Smirnov based drug repositioning.
//!
//! Given a gene list ranked by statistical significance (e.g. from a
//! differential expression or methylation analysis) and a database of
//! gene-compound interactions, this crate computes a one-sided KS enrichment
//! statistic per compound, estimates its significance by resampling, and
//! reports multiple-testing corrected q-values.
//!
//! ## Core Features
//!
//! - **Enrichment statistic**: one-sided, top-biased KS statistic over the
//!   rank positions of each compound's genes
//! - **Resampling**: compound resampling (random gene sets of equal size) or
//!   list resampling (random permutations of the gene list), reproducible
//!   under a fixed seed and parallelised with rayon
//! - **Multiple Testing Correction**: Benjamini-Hochberg by default, plus
//!   Benjamini-Yekutieli, Bonferroni, Holm, Hochberg and Storey q-values
//!
//! ## Quick Start
//!
//! Build an [`enrichment::InteractionDatabase`], pick a
//! [`enrichment::KsRepoConfig`] and call [`enrichment::ks_repo`] with the
//! ordered gene list.
//!
//! ## Module Organization
//!
//! - **[`enrichment`]**: rank index, KS statistic, resampling and the analysis driver
//! - **[`testing`]**: multiple testing correction
//! - **[`error`]**: error taxonomy

pub mod enrichment;
pub mod error;
pub mod testing;

pub use enrichment::{
    CompoundResult, InteractionDatabase, KsRepoConfig, KsRepoResults, ResampleMode, ks_repo,
};
pub use error::KsRepoError;
pub use testing::CorrectionMethod;
