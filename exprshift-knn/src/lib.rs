//! Unsupervised kNN change detection for gene-expression matrices.
//!
//! Detects per-gene expression changes by normalizing each gene against
//! a local estimate computed from its k nearest neighbor genes in a
//! reference (wild-type) matrix:
//!
//! 1. **Neighbors** — [`NeighborGraph`] ranks all genes by Euclidean
//!    distance between expression profiles and keeps each gene's k
//!    nearest others.
//! 2. **Local estimates** — [`local_mean_variance`] or
//!    [`local_median_mad`] reduce the neighbor rows to per-gene,
//!    per-feature location and spread.
//! 3. **Scores** — [`z_scores`] or [`modified_z_scores`] standardize an
//!    observed (treatment) matrix against those estimates.
//!
//! [`knn_z_scores`] and [`knn_modified_z_scores`] run all three stages.
//! Every stage is a pure function of its inputs; re-running the
//! pipeline on identical inputs yields bit-identical output.
//!
//! With the default `parallel` feature the distance matrix and the
//! per-gene estimate loops shard across genes via rayon; output row
//! order is preserved either way.

pub mod distance;
pub mod local;
pub mod neighbors;
pub mod score;

pub use distance::{euclidean, DistanceMatrix};
pub use local::{local_mean_variance, local_median_mad, LocalStats};
pub use neighbors::NeighborGraph;
pub use score::{modified_z_scores, z_scores, MAD_SCALE};

use exprshift_core::{ExprshiftError, GeneMatrix, Progress, Result};

/// Full z-score pipeline: neighbors and mean/variance estimates from
/// `reference`, classic z-scores of `observed` against them.
///
/// `observed` and `reference` must have the same shape and share gene
/// ordering.
///
/// # Errors
///
/// Propagates [`ExprshiftError::InsufficientGenes`],
/// [`ExprshiftError::ShapeMismatch`], and
/// [`ExprshiftError::DegenerateSpread`] from the individual stages.
pub fn knn_z_scores(
    k: usize,
    observed: &GeneMatrix,
    reference: &GeneMatrix,
    progress: &(dyn Progress + Sync),
) -> Result<GeneMatrix> {
    check_paired(observed, reference)?;
    let graph = NeighborGraph::build(k, reference)?;
    let stats = local_mean_variance(&graph, reference, progress)?;
    z_scores(observed, &stats)
}

/// Full modified z-score pipeline: neighbors and median/MAD estimates
/// from `reference`, robust z-scores of `observed` against them.
///
/// # Errors
///
/// Same contract as [`knn_z_scores`], with a zero MAD instead of a zero
/// variance as the degenerate case.
pub fn knn_modified_z_scores(
    k: usize,
    observed: &GeneMatrix,
    reference: &GeneMatrix,
    progress: &(dyn Progress + Sync),
) -> Result<GeneMatrix> {
    check_paired(observed, reference)?;
    let graph = NeighborGraph::build(k, reference)?;
    let stats = local_median_mad(&graph, reference, progress)?;
    modified_z_scores(observed, &stats)
}

fn check_paired(observed: &GeneMatrix, reference: &GeneMatrix) -> Result<()> {
    if !observed.same_shape(reference) {
        let (og, of) = observed.shape();
        let (rg, rf) = reference.shape();
        return Err(ExprshiftError::ShapeMismatch(format!(
            "observed matrix is {og}\u{00d7}{of} but reference is {rg}\u{00d7}{rf}"
        )));
    }
    Ok(())
}
