//! Standardized outlier scores from local estimates.
//!
//! Pure, stateless transforms: an observed matrix plus a matching
//! [`LocalStats`] in, a score matrix of the same shape out.

use exprshift_core::{ExprshiftError, GeneMatrix, Result};

use crate::local::LocalStats;

/// Scaling constant for the modified z-score.
///
/// Under normality `MAD ≈ 0.6745 σ`, so scaling by 0.6745 makes the
/// modified z-score comparable to a classic z-score.
pub const MAD_SCALE: f64 = 0.6745;

/// Classic z-scores: `(x - mean) / sqrt(variance)` per entry.
///
/// `stats` must be a (mean, variance) pair from
/// [`local_mean_variance`](crate::local::local_mean_variance).
///
/// # Errors
///
/// [`ExprshiftError::ShapeMismatch`] when `observed` and `stats` differ
/// in shape; [`ExprshiftError::DegenerateSpread`] naming the first
/// gene/feature pair whose variance is zero. No IEEE infinities or NaNs
/// are produced.
pub fn z_scores(observed: &GeneMatrix, stats: &LocalStats) -> Result<GeneMatrix> {
    transform(observed, stats, |x, mean, var| (x - mean) / var.sqrt())
}

/// Modified (robust) z-scores: `0.6745 * (x - median) / MAD` per entry.
///
/// `stats` must be a (median, MAD) pair from
/// [`local_median_mad`](crate::local::local_median_mad).
///
/// # Errors
///
/// Same policy as [`z_scores`]; a zero MAD is a
/// [`ExprshiftError::DegenerateSpread`] error.
pub fn modified_z_scores(observed: &GeneMatrix, stats: &LocalStats) -> Result<GeneMatrix> {
    transform(observed, stats, |x, median, mad| {
        MAD_SCALE * (x - median) / mad
    })
}

fn transform<F>(observed: &GeneMatrix, stats: &LocalStats, f: F) -> Result<GeneMatrix>
where
    F: Fn(f64, f64, f64) -> f64,
{
    let (n_genes, n_features) = observed.shape();
    if stats.shape() != (n_genes, n_features) {
        return Err(ExprshiftError::ShapeMismatch(format!(
            "observed matrix is {n_genes}\u{00d7}{n_features} but stats are {}\u{00d7}{}",
            stats.shape().0,
            stats.shape().1
        )));
    }

    let location = stats.location();
    let spread = stats.spread();
    let mut scores = Vec::with_capacity(n_genes * n_features);
    for (idx, &x) in observed.as_slice().iter().enumerate() {
        if spread[idx] == 0.0 {
            return Err(ExprshiftError::DegenerateSpread {
                gene: idx / n_features,
                feature: idx % n_features,
            });
        }
        scores.push(f(x, location[idx], spread[idx]));
    }

    GeneMatrix::from_flat(
        scores,
        observed.gene_names().to_vec(),
        observed.feature_names().to_vec(),
    )
}
