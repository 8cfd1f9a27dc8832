//! Multiple testing correction methods to control for false positives
//! when many compounds are tested against the same gene list.

use anyhow::{Result, anyhow};
use std::cmp::Ordering;

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(anyhow!("Empty p-value array"));
    }

    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }
    Ok(())
}

/// Indices of `p_values` in ascending p-value order. Ties keep input order.
fn ascending_order(p_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p_values.len()).collect();
    order.sort_by(|&a, &b| {
        p_values[a]
            .partial_cmp(&p_values[b])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Step-up adjustment shared by BH and BY: `p_(i) * scale * n / i`, made
/// monotone by a running minimum from the largest p-value down.
fn step_up(p_values: &[f64], scale: f64) -> Vec<f64> {
    let n = p_values.len();
    let order = ascending_order(p_values);

    let mut adjusted = vec![0.0; n];
    let mut current_min = 1.0_f64;

    for (i, &idx) in order.iter().enumerate().rev() {
        let rank = i + 1;
        let adjustment = (p_values[idx] * scale * n as f64 / rank as f64).min(1.0);
        current_min = current_min.min(adjustment);
        adjusted[idx] = current_min;
    }
    adjusted
}

/// Apply Bonferroni correction to p-values
///
/// Multiplies each p-value by the number of tests, capping at 1.
///
/// # Example
/// ```
/// use ksrepo::testing::correction::bonferroni_correction;
/// let adjusted = bonferroni_correction(&[0.01, 0.03, 0.05]).unwrap();
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// ```
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len() as f64;
    Ok(p_values.iter().map(|&p| (p * n).min(1.0)).collect())
}

/// Apply Benjamini-Hochberg (BH) procedure for controlling false discovery rate
///
/// The BH procedure controls the expected proportion of false positives among
/// all rejected null hypotheses. Adjusted values are never smaller than the
/// raw p-values and are non-decreasing along ascending p-value order.
///
/// # Example
/// ```
/// use ksrepo::testing::correction::benjamini_hochberg_correction;
/// let adjusted = benjamini_hochberg_correction(&[0.01, 0.02, 0.03, 0.04, 0.05]).unwrap();
/// assert!(adjusted.iter().all(|&q| (q - 0.05).abs() < 1e-12));
/// ```
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    Ok(step_up(p_values, 1.0))
}

/// Apply Benjamini-Yekutieli (BY) procedure for controlling false discovery rate under dependence
///
/// A more conservative variant of BH, valid under arbitrary dependence between
/// tests. Compounds sharing genes produce such dependence.
pub fn benjamini_yekutieli_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let c_n: f64 = (1..=p_values.len()).map(|i| 1.0 / i as f64).sum();
    Ok(step_up(p_values, c_n))
}

/// Apply Holm-Bonferroni (step-down) method for controlling family-wise error rate
///
/// `p_(i) * (n - i + 1)`, made monotone by a running maximum from the smallest
/// p-value up.
pub fn holm_bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();
    let order = ascending_order(p_values);

    let mut adjusted = vec![0.0; n];
    let mut current_max = 0.0_f64;

    for (i, &idx) in order.iter().enumerate() {
        let adjustment = (p_values[idx] * (n - i) as f64).min(1.0);
        current_max = current_max.max(adjustment);
        adjusted[idx] = current_max;
    }
    Ok(adjusted)
}

/// Apply Hochberg's step-up method for controlling family-wise error rate
///
/// `p_(i) * (n - i + 1)`, made monotone by a running minimum from the largest
/// p-value down.
pub fn hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();
    let order = ascending_order(p_values);

    let mut adjusted = vec![0.0; n];
    let mut current_min = 1.0_f64;

    for (i, &idx) in order.iter().enumerate().rev() {
        let adjustment = (p_values[idx] * (n - i) as f64).min(1.0);
        current_min = current_min.min(adjustment);
        adjusted[idx] = current_min;
    }
    Ok(adjusted)
}

/// Apply Storey's q-value method for controlling false discovery rate
///
/// Estimates the proportion of true null hypotheses (π0) as the share of
/// p-values above `lambda`, rescaled by `1 - lambda`, and multiplies the BH
/// adjusted values by it. When no p-value exceeds `lambda` the estimate
/// would be 0; π0 is then taken as 1, which reduces to plain BH and keeps every
/// q-value positive.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
/// * `lambda` - Tuning parameter for π0 estimation, in `[0, 1)`, typically 0.5
pub fn storey_qvalues(p_values: &[f64], lambda: f64) -> Result<Vec<f64>> {
    if !(0.0..1.0).contains(&lambda) {
        return Err(anyhow!("Lambda must be between 0 and 1, got {}", lambda));
    }
    validate_p_values(p_values)?;

    let n = p_values.len() as f64;
    let w = p_values.iter().filter(|&&p| p > lambda).count();
    let pi0 = if w == 0 {
        1.0
    } else {
        (w as f64 / (n * (1.0 - lambda))).min(1.0)
    };

    let bh_adjusted = step_up(p_values, 1.0);
    Ok(bh_adjusted.iter().map(|&p| (p * pi0).min(1.0)).collect())
}
