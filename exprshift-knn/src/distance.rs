//! Euclidean distances between gene expression profiles.

use exprshift_core::{ExprshiftError, GeneMatrix, Result, Summarizable};

/// Euclidean (L2) distance between two vectors.
pub fn euclidean(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.is_empty() {
        return Err(ExprshiftError::InvalidInput("empty vectors".into()));
    }
    if a.len() != b.len() {
        return Err(ExprshiftError::ShapeMismatch(format!(
            "vector lengths differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(l2(a, b))
}

/// L2 distance without validation; callers guarantee equal lengths.
fn l2(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    sum.sqrt()
}

/// Symmetric gene-vs-gene distance matrix stored in condensed
/// upper-triangle form.
///
/// For `n` genes the condensed vector has `n*(n-1)/2` elements. The
/// diagonal is implicitly zero and `get(i, j) == get(j, i)`. Distances
/// are always between genes (rows) over the feature dimension, never
/// between features.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    condensed: Vec<f64>,
    n: usize,
}

impl DistanceMatrix {
    /// Pairwise Euclidean distances between the gene rows of `matrix`.
    pub fn from_gene_matrix(matrix: &GeneMatrix) -> Result<Self> {
        let n = matrix.n_genes();
        let nf = matrix.n_features();
        if n < 2 {
            return Err(ExprshiftError::InvalidInput(
                "need at least 2 genes".into(),
            ));
        }
        if nf == 0 {
            return Err(ExprshiftError::InvalidInput(
                "matrix has no features".into(),
            ));
        }
        let data = matrix.as_slice();

        #[cfg(feature = "parallel")]
        let condensed = {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|i| {
                    let ri = &data[i * nf..(i + 1) * nf];
                    ((i + 1)..n)
                        .map(|j| l2(ri, &data[j * nf..(j + 1) * nf]))
                        .collect::<Vec<f64>>()
                })
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect::<Vec<f64>>()
        };
        #[cfg(not(feature = "parallel"))]
        let condensed = {
            let mut condensed = Vec::with_capacity(n * (n - 1) / 2);
            for i in 0..n {
                let ri = &data[i * nf..(i + 1) * nf];
                for j in (i + 1)..n {
                    condensed.push(l2(ri, &data[j * nf..(j + 1) * nf]));
                }
            }
            condensed
        };

        Ok(Self { condensed, n })
    }

    /// The distance between genes `i` and `j`.
    ///
    /// Returns 0.0 when `i == j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        let (a, b) = if i < j { (i, j) } else { (j, i) };
        self.condensed[self.index(a, b)]
    }

    /// Number of genes.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Access the raw condensed storage.
    pub fn condensed(&self) -> &[f64] {
        &self.condensed
    }

    /// Map (i, j) where i < j to condensed index.
    fn index(&self, i: usize, j: usize) -> usize {
        // row i starts at position: i*n - i*(i+1)/2
        i * self.n - i * (i + 1) / 2 + (j - i - 1)
    }
}

impl Summarizable for DistanceMatrix {
    fn summary(&self) -> String {
        format!("DistanceMatrix: {}x{}", self.n, self.n)
    }
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

    #[test]
    fn euclidean_known_value() {
        let d = euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn euclidean_length_mismatch() {
        assert!(euclidean(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn euclidean_empty_error() {
        assert!(euclidean(&[], &[]).is_err());
    }

    #[test]
    fn symmetric_with_zero_diagonal() {
        let m = matrix(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 2.0],
            vec![3.0, 3.0],
        ]);
        let dm = DistanceMatrix::from_gene_matrix(&m).unwrap();
        for i in 0..4 {
            assert_eq!(dm.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(dm.get(i, j), dm.get(j, i));
                assert!(dm.get(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn condensed_length() {
        let m = matrix(vec![vec![0.0], vec![1.0], vec![2.0], vec![4.0], vec![8.0]]);
        let dm = DistanceMatrix::from_gene_matrix(&m).unwrap();
        assert_eq!(dm.condensed().len(), 5 * 4 / 2);
        assert_eq!(dm.n(), 5);
    }

    #[test]
    fn known_pairwise_values() {
        let m = matrix(vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![6.0, 8.0]]);
        let dm = DistanceMatrix::from_gene_matrix(&m).unwrap();
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-12);
        assert!((dm.get(0, 2) - 10.0).abs() < 1e-12);
        assert!((dm.get(1, 2) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn single_gene_error() {
        let m = matrix(vec![vec![1.0, 2.0]]);
        assert!(DistanceMatrix::from_gene_matrix(&m).is_err());
    }
}
