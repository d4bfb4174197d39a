//! Per-gene local location/spread estimates over neighbor sets.
//!
//! Both estimators walk the same structure: for each gene, visit the
//! rows of a source matrix indexed by that gene's neighbor set and
//! reduce them per feature. They differ in the statistic and, notably,
//! in where deviations are centered:
//!
//! - [`local_mean_variance`] centers each neighbor's squared deviation
//!   on **that neighbor's own** local mean;
//! - [`local_median_mad`] centers absolute deviations on the **target
//!   gene's** local median.
//!
//! The asymmetry is deliberate: it reproduces the published estimator
//! exactly rather than unifying the two centering policies.

use exprshift_core::{ExprshiftError, GeneMatrix, Progress, Result};

use crate::neighbors::NeighborGraph;

/// Per-gene, per-feature location and spread estimates.
///
/// Shape matches the source matrix (n_genes × n_features). The pair is
/// either (mean, variance) or (median, MAD) depending on the estimator
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalStats {
    location: Vec<f64>,
    spread: Vec<f64>,
    n_genes: usize,
    n_features: usize,
}

impl LocalStats {
    /// Create from flat row-major location and spread arrays.
    ///
    /// # Errors
    ///
    /// Returns [`ExprshiftError::ShapeMismatch`] if either array's
    /// length is not `n_genes * n_features`.
    pub fn from_parts(
        location: Vec<f64>,
        spread: Vec<f64>,
        n_genes: usize,
        n_features: usize,
    ) -> Result<Self> {
        let expected = n_genes * n_features;
        if location.len() != expected || spread.len() != expected {
            return Err(ExprshiftError::ShapeMismatch(format!(
                "location/spread lengths {}/{} do not match {n_genes} genes \u{00d7} {n_features} features",
                location.len(),
                spread.len()
            )));
        }
        Ok(Self {
            location,
            spread,
            n_genes,
            n_features,
        })
    }

    /// (n_genes, n_features).
    pub fn shape(&self) -> (usize, usize) {
        (self.n_genes, self.n_features)
    }

    /// Flat row-major location estimates.
    pub fn location(&self) -> &[f64] {
        &self.location
    }

    /// Flat row-major spread estimates.
    pub fn spread(&self) -> &[f64] {
        &self.spread
    }

    /// One gene's location estimates across all features.
    ///
    /// # Panics
    ///
    /// Panics if `gene >= n_genes`.
    pub fn location_row(&self, gene: usize) -> &[f64] {
        &self.location[gene * self.n_features..(gene + 1) * self.n_features]
    }

    /// One gene's spread estimates across all features.
    ///
    /// # Panics
    ///
    /// Panics if `gene >= n_genes`.
    pub fn spread_row(&self, gene: usize) -> &[f64] {
        &self.spread[gene * self.n_features..(gene + 1) * self.n_features]
    }
}

/// Local mean and variance over each gene's neighbor set.
///
/// `Mean[i]` is the per-feature arithmetic mean of the `k` neighbor
/// rows of `source`. `Variance[i][f]` is the mean over neighbors `j` of
/// `(source[j][f] - Mean[j][f])²`; each deviation is measured against
/// the neighbor's own local mean, not gene `i`'s (see the module docs).
///
/// # Errors
///
/// Returns [`ExprshiftError::ShapeMismatch`] when `source` does not
/// match the shape of the matrix the graph was built from.
pub fn local_mean_variance(
    graph: &NeighborGraph,
    source: &GeneMatrix,
    progress: &(dyn Progress + Sync),
) -> Result<LocalStats> {
    validate_source(graph, source)?;
    let n = graph.n_genes();
    let nf = source.n_features();
    let k = graph.k() as f64;
    let data = source.as_slice();

    let means = per_gene(n, progress, "means", |i| {
        let mut row = vec![0.0; nf];
        for &j in graph.neighbors(i) {
            let src = &data[j * nf..(j + 1) * nf];
            for (acc, v) in row.iter_mut().zip(src) {
                *acc += v;
            }
        }
        for v in &mut row {
            *v /= k;
        }
        row
    });

    let variances = per_gene(n, progress, "variances", |i| {
        let mut row = vec![0.0; nf];
        for &j in graph.neighbors(i) {
            let src = &data[j * nf..(j + 1) * nf];
            let own_mean = &means[j * nf..(j + 1) * nf];
            for f in 0..nf {
                let dev = src[f] - own_mean[f];
                row[f] += dev * dev;
            }
        }
        for v in &mut row {
            *v /= k;
        }
        row
    });

    Ok(LocalStats {
        location: means,
        spread: variances,
        n_genes: n,
        n_features: nf,
    })
}

/// Local median and MAD over each gene's neighbor set.
///
/// `Median[i]` is the per-feature median of the `k` neighbor rows of
/// `source`; `MAD[i][f]` is the median of `|source[j][f] - Median[i][f]|`
/// over neighbors `j`, centered on gene `i`'s own median.
///
/// # Errors
///
/// Returns [`ExprshiftError::ShapeMismatch`] when `source` does not
/// match the shape of the matrix the graph was built from.
pub fn local_median_mad(
    graph: &NeighborGraph,
    source: &GeneMatrix,
    progress: &(dyn Progress + Sync),
) -> Result<LocalStats> {
    validate_source(graph, source)?;
    let n = graph.n_genes();
    let nf = source.n_features();
    let k = graph.k();
    let data = source.as_slice();

    let rows = per_gene(n, progress, "median/MAD", |i| {
        let mut row = vec![0.0; 2 * nf]; // median row then MAD row
        let mut buf = vec![0.0; k];
        for f in 0..nf {
            for (slot, &j) in buf.iter_mut().zip(graph.neighbors(i)) {
                *slot = data[j * nf + f];
            }
            let med = median_in_place(&mut buf);
            row[f] = med;
            for v in &mut buf {
                *v = (med - *v).abs();
            }
            row[nf + f] = median_in_place(&mut buf);
        }
        row
    });

    // split the interleaved per-gene rows back into two flat matrices
    let mut medians = Vec::with_capacity(n * nf);
    let mut mads = Vec::with_capacity(n * nf);
    for gene in rows.chunks_exact(2 * nf) {
        medians.extend_from_slice(&gene[..nf]);
        mads.extend_from_slice(&gene[nf..]);
    }

    Ok(LocalStats {
        location: medians,
        spread: mads,
        n_genes: n,
        n_features: nf,
    })
}

/// Run `f` for every gene and flatten the per-gene rows, reporting
/// batched progress. Output row order always matches gene order.
fn per_gene<F>(n: usize, progress: &(dyn Progress + Sync), stage: &str, f: F) -> Vec<f64>
where
    F: Fn(usize) -> Vec<f64> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        use std::sync::atomic::{AtomicUsize, Ordering};
        let done = AtomicUsize::new(0);
        (0..n)
            .into_par_iter()
            .map(|i| {
                let row = f(i);
                let d = done.fetch_add(1, Ordering::Relaxed) + 1;
                progress.on_gene(stage, d, n);
                row
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut out = Vec::new();
        for i in 0..n {
            out.extend(f(i));
            progress.on_gene(stage, i + 1, n);
        }
        out
    }
}

fn validate_source(graph: &NeighborGraph, source: &GeneMatrix) -> Result<()> {
    if source.n_genes() != graph.n_genes() {
        return Err(ExprshiftError::ShapeMismatch(format!(
            "source has {} genes but the neighbor graph was built from {}",
            source.n_genes(),
            graph.n_genes()
        )));
    }
    if source.n_features() != graph.n_features() {
        return Err(ExprshiftError::ShapeMismatch(format!(
            "source has {} features but the neighbor graph was built over {}",
            source.n_features(),
            graph.n_features()
        )));
    }
    Ok(())
}

/// Median of a buffer, sorting it as a side effect.
fn median_in_place(buf: &mut [f64]) -> f64 {
    buf.sort_by(|a, b| a.total_cmp(b));
    let n = buf.len();
    if n % 2 == 0 {
        (buf[n / 2 - 1] + buf[n / 2]) / 2.0
    } else {
        buf[n / 2]
    }
}
