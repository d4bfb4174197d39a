//! k-nearest-neighbor search over gene profiles.

use exprshift_core::{ExprshiftError, GeneMatrix, Result, Summarizable};

use crate::distance::DistanceMatrix;

/// Per-gene k nearest neighbors, built from a reference matrix.
///
/// For each gene the `k` nearest *other* genes are stored ascending by
/// Euclidean distance. The gene itself is excluded by index, never by
/// sort position, so a duplicate profile elsewhere in the matrix can
/// never leave a gene in its own neighbor list. Equal distances break
/// toward the lower gene index (stable sort over candidates visited in
/// index order), which makes the output deterministic.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborGraph {
    neighbors: Vec<usize>, // flat, n_genes * k
    k: usize,
    n_genes: usize,
    n_features: usize,
    distances: DistanceMatrix,
}

impl NeighborGraph {
    /// Build the neighbor graph for all genes of `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`ExprshiftError::InsufficientGenes`] unless
    /// `1 <= k < reference.n_genes()`.
    pub fn build(k: usize, reference: &GeneMatrix) -> Result<Self> {
        if k == 0 {
            return Err(ExprshiftError::InvalidInput("k must be >= 1".into()));
        }
        let n = reference.n_genes();
        if n <= k {
            return Err(ExprshiftError::InsufficientGenes { k, n_genes: n });
        }

        let distances = DistanceMatrix::from_gene_matrix(reference)?;

        #[cfg(feature = "parallel")]
        let neighbors = {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|i| nearest(&distances, i, k))
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect::<Vec<usize>>()
        };
        #[cfg(not(feature = "parallel"))]
        let neighbors = {
            let mut neighbors = Vec::with_capacity(n * k);
            for i in 0..n {
                neighbors.extend(nearest(&distances, i, k));
            }
            neighbors
        };

        Ok(Self {
            neighbors,
            k,
            n_genes: n,
            n_features: reference.n_features(),
            distances,
        })
    }

    /// Neighbor count per gene.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of genes in the reference matrix.
    pub fn n_genes(&self) -> usize {
        self.n_genes
    }

    /// Feature count of the reference matrix the graph was built from.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// The `k` neighbor indices of `gene`, ascending by distance.
    ///
    /// # Panics
    ///
    /// Panics if `gene >= n_genes`.
    pub fn neighbors(&self, gene: usize) -> &[usize] {
        &self.neighbors[gene * self.k..(gene + 1) * self.k]
    }

    /// The pairwise distance matrix the graph was built from.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

impl Summarizable for NeighborGraph {
    fn summary(&self) -> String {
        format!("NeighborGraph: {} genes, k={}", self.n_genes, self.k)
    }
}

/// Rank all other genes by distance from `i` and keep the closest `k`.
fn nearest(distances: &DistanceMatrix, i: usize, k: usize) -> Vec<usize> {
    let n = distances.n();
    let mut candidates: Vec<(usize, f64)> = (0..n)
        .filter(|&j| j != i)
        .map(|j| (j, distances.get(i, j)))
        .collect();
    // stable sort keeps ascending-index order for equal distances
    candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(k);
    candidates.into_iter().map(|(j, _)| j).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> GeneMatrix {
        let n_features = rows[0].len();
        let gene_names = (0..rows.len()).map(|i| format!("g{i}")).collect();
        let feature_names = (0..n_features).map(|i| format!("f{i}")).collect();
        GeneMatrix::new(rows, gene_names, feature_names).unwrap()
    }

    fn line_matrix() -> GeneMatrix {
        // 1-D profiles at 0, 1, 3, 7, 15
        matrix(vec![vec![0.0], vec![1.0], vec![3.0], vec![7.0], vec![15.0]])
    }

    #[test]
    fn exactly_k_per_gene_no_self() {
        let m = line_matrix();
        for k in 1..5 {
            let graph = NeighborGraph::build(k, &m).unwrap();
            for gene in 0..m.n_genes() {
                let nb = graph.neighbors(gene);
                assert_eq!(nb.len(), k);
                assert!(!nb.contains(&gene));
            }
        }
    }

    #[test]
    fn distances_non_decreasing() {
        let m = line_matrix();
        let graph = NeighborGraph::build(3, &m).unwrap();
        for gene in 0..m.n_genes() {
            let nb = graph.neighbors(gene);
            for w in nb.windows(2) {
                let d0 = graph.distances().get(gene, w[0]);
                let d1 = graph.distances().get(gene, w[1]);
                assert!(d0 <= d1);
            }
        }
    }

    #[test]
    fn known_nearest() {
        let m = line_matrix();
        let graph = NeighborGraph::build(2, &m).unwrap();
        // gene 2 at 3.0: nearest are gene 1 (d=2) then gene 0 (d=3)
        assert_eq!(graph.neighbors(2), &[1, 0]);
        // gene 4 at 15.0: nearest are gene 3 (d=8) then gene 2 (d=12)
        assert_eq!(graph.neighbors(4), &[3, 2]);
    }

    #[test]
    fn k_not_below_gene_count() {
        let m = line_matrix();
        assert!(matches!(
            NeighborGraph::build(5, &m),
            Err(ExprshiftError::InsufficientGenes { k: 5, n_genes: 5 })
        ));
        assert!(NeighborGraph::build(4, &m).is_ok());
    }

    #[test]
    fn zero_k_rejected() {
        let m = line_matrix();
        assert!(NeighborGraph::build(0, &m).is_err());
    }

    #[test]
    fn duplicate_profiles_never_self() {
        // genes 0 and 1 share a profile; the zero-distance tie must not
        // let either gene appear in its own neighbor list
        let m = matrix(vec![
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![5.0, 5.0],
            vec![9.0, 9.0],
        ]);
        let graph = NeighborGraph::build(2, &m).unwrap();
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
    }

    #[test]
    fn ties_break_toward_lower_index() {
        // genes 1 and 2 are equidistant from gene 0
        let m = matrix(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 10.0],
        ]);
        let graph = NeighborGraph::build(2, &m).unwrap();
        assert_eq!(graph.neighbors(0), &[1, 2]);
    }
}
