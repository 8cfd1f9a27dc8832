use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::ks::ks_statistic;
use super::rank::RankIndex;
use super::resample::{Resampler, bootstrap_p_value};
use super::{
    CompoundResult, InteractionDatabase, KsRepoConfig, KsRepoResults, ResampleMode,
    ResolvedCompound,
};
use crate::error::{KsRepoError, Result};
use crate::testing::adjust_p_values;

/// Run the ksRepo analysis.
///
/// `gene_list` must be ordered from most to least significant and contain
/// no duplicates. Every compound with at least one gene in the list gets a
/// row holding its n.genes, observed KS statistic, bootstrap p-value and
/// corrected q-value; compounds with no genes in the list are skipped.
///
/// # Errors
/// * [`KsRepoError::EmptyGeneList`] / [`KsRepoError::DuplicateGene`] for an
///   invalid gene list, raised before any compound is scored
/// * [`KsRepoError::InvalidConfig`] for a configuration that fails
///   [`KsRepoConfig::validate`]
///
/// An empty database, or one whose compounds all miss the list, returns an
/// empty table.
pub fn ks_repo<S: AsRef<str>>(
    gene_list: &[S],
    db: &InteractionDatabase,
    config: &KsRepoConfig,
) -> Result<KsRepoResults> {
    config.validate()?;
    let index = RankIndex::new(gene_list)?;

    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!(seed, "No seed supplied, drew master seed from entropy");
            seed
        }
    };

    info!(
        genes = index.len(),
        compounds = db.len(),
        resamples = config.resamples,
        mode = ?config.mode,
        seed,
        "Starting ksRepo analysis"
    );

    let results = match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| KsRepoError::ThreadPool(e.to_string()))?;
            pool.install(|| analyse(&index, db, config, seed))?
        }
        None => analyse(&index, db, config, seed)?,
    };

    info!(rows = results.len(), "Finished ksRepo analysis");
    Ok(results)
}

fn resolve_compounds(index: &RankIndex, db: &InteractionDatabase) -> Vec<ResolvedCompound> {
    let n = index.len();
    db.iter()
        .filter_map(|(name, genes)| {
            let ranks = index.resolve(genes);
            if ranks.is_empty() {
                debug!(compound = %name, "No genes of compound in gene list, skipping");
                return None;
            }
            let ks = ks_statistic(&ranks, n);
            Some(ResolvedCompound {
                name: name.clone(),
                ranks,
                ks,
            })
        })
        .collect()
}

fn analyse(
    index: &RankIndex,
    db: &InteractionDatabase,
    config: &KsRepoConfig,
    seed: u64,
) -> Result<KsRepoResults> {
    let compounds = resolve_compounds(index, db);
    if compounds.is_empty() {
        warn!(
            compounds = db.len(),
            "No compound has genes in the gene list, returning empty table"
        );
        return Ok(KsRepoResults::default());
    }
    debug!(
        analysed = compounds.len(),
        skipped = db.len() - compounds.len(),
        "Resolved compound gene sets"
    );

    let resampler = Resampler::new(config.mode, config.resamples, seed, index.len());
    match config.mode {
        ResampleMode::Compound => {
            for c in &compounds {
                let stream = resampler.stream_id(&c.name);
                debug!(
                    compound = %c.name,
                    stream,
                    first_seed = resampler.resample_seed(stream, 0),
                    "Derived resample seed stream"
                );
            }
        }
        ResampleMode::List => {
            let stream = resampler.stream_id("");
            debug!(
                stream,
                first_seed = resampler.resample_seed(stream, 0),
                "Derived resample seed stream"
            );
        }
    }

    let exceedances: Vec<usize> = match config.mode {
        ResampleMode::Compound => compounds
            .par_iter()
            .map(|c| resampler.compound_exceedances(&c.name, &c.ranks, c.ks))
            .collect(),
        ResampleMode::List => resampler.list_exceedances(&compounds),
    };

    let p_values: Vec<f64> = exceedances
        .iter()
        .map(|&e| bootstrap_p_value(e, config.resamples))
        .collect();
    let q_values = adjust_p_values(&p_values, config.correction)?;

    let mut rows: Vec<CompoundResult> = compounds
        .into_iter()
        .zip(p_values.into_iter().zip(q_values))
        .map(|(c, (boot_p, boot_fdr))| CompoundResult {
            compound: c.name,
            n_genes: c.ranks.len(),
            ks: c.ks,
            boot_p,
            boot_fdr,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.boot_fdr
            .total_cmp(&b.boot_fdr)
            .then(a.boot_p.total_cmp(&b.boot_p))
            .then(b.ks.total_cmp(&a.ks))
            .then_with(|| a.compound.cmp(&b.compound))
    });

    Ok(KsRepoResults::new(rows))
}
