use std::collections::HashMap;

use crate::error::{KsRepoError, Result};

/// Lookup from gene symbol to its 0-based position in a significance-ordered
/// gene list (most significant gene first).
///
/// Built once per analysis and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RankIndex {
    genes: Vec<String>,
    positions: HashMap<String, usize>,
}

impl RankIndex {
    /// Build the index from an ordered gene list.
    ///
    /// Fails on an empty list or on the first duplicated symbol, reporting
    /// both positions of the duplicate.
    pub fn new<S: AsRef<str>>(gene_list: &[S]) -> Result<Self> {
        if gene_list.is_empty() {
            return Err(KsRepoError::EmptyGeneList);
        }

        let mut positions = HashMap::with_capacity(gene_list.len());
        let mut genes = Vec::with_capacity(gene_list.len());

        for (rank, gene) in gene_list.iter().enumerate() {
            let gene = gene.as_ref();
            if let Some(&first) = positions.get(gene) {
                return Err(KsRepoError::DuplicateGene {
                    gene: gene.to_string(),
                    first,
                    second: rank,
                });
            }
            positions.insert(gene.to_string(), rank);
            genes.push(gene.to_string());
        }

        Ok(RankIndex { genes, positions })
    }

    /// Number of genes in the list (N).
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn rank(&self, gene: &str) -> Option<usize> {
        self.positions.get(gene).copied()
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.positions.contains_key(gene)
    }

    /// Genes in their original order.
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    /// Resolve a gene set to the ascending ranks of the genes present in the
    /// list. Genes missing from the list are dropped; the length of the
    /// returned vector is the compound's n.genes.
    pub fn resolve<'a, I>(&self, gene_set: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut ranks: Vec<usize> = gene_set
            .into_iter()
            .filter_map(|gene| self.rank(gene))
            .collect();
        ranks.sort_unstable();
        ranks.dedup();
        ranks
    }
}
