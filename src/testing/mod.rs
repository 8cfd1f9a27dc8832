use serde::{Deserialize, Serialize};

use crate::error::{KsRepoError, Result};

pub mod correction;

/// Multiple testing correction applied to the bootstrap p-values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMethod {
    #[default]
    BenjaminiHochberg,
    BenjaminiYekutieli,
    Bonferroni,
    Holm,
    Hochberg,
    Storey { lambda: f64 },
    /// Report the raw p-values as q-values
    None,
}

impl CorrectionMethod {
    pub fn validate(&self) -> Result<()> {
        match self {
            CorrectionMethod::Storey { lambda } if !(0.0..1.0).contains(lambda) => {
                Err(KsRepoError::InvalidConfig(format!(
                    "Storey lambda must be in [0, 1), got {}",
                    lambda
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Adjust `p_values` with `method`. An empty slice yields an empty vector.
pub fn adjust_p_values(p_values: &[f64], method: CorrectionMethod) -> Result<Vec<f64>> {
    if p_values.is_empty() {
        return Ok(Vec::new());
    }

    let adjusted = match method {
        CorrectionMethod::BenjaminiHochberg => correction::benjamini_hochberg_correction(p_values),
        CorrectionMethod::BenjaminiYekutieli => {
            correction::benjamini_yekutieli_correction(p_values)
        }
        CorrectionMethod::Bonferroni => correction::bonferroni_correction(p_values),
        CorrectionMethod::Holm => correction::holm_bonferroni_correction(p_values),
        CorrectionMethod::Hochberg => correction::hochberg_correction(p_values),
        CorrectionMethod::Storey { lambda } => correction::storey_qvalues(p_values, lambda),
        CorrectionMethod::None => Ok(p_values.to_vec()),
    };

    adjusted.map_err(|e| KsRepoError::Correction(e.to_string()))
}
