use thiserror::Error;

/// Errors raised by the ksRepo analysis.
///
/// Input-shape problems are reported before any per-compound work starts.
/// Per-compound degeneracies (no resolvable genes, a gene set covering the
/// whole list) are handled locally and never surface as errors.
#[derive(Debug, Error)]
pub enum KsRepoError {
    #[error("Gene list cannot be empty")]
    EmptyGeneList,

    #[error("Duplicate gene symbol '{gene}' at positions {first} and {second}")]
    DuplicateGene {
        gene: String,
        first: usize,
        second: usize,
    },

    #[error("Compound '{compound}' has an empty gene set")]
    EmptyGeneSet { compound: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Multiple testing correction failed: {0}")]
    Correction(String),

    #[error("Could not build thread pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, KsRepoError>;
