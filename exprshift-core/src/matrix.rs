//! Dense labelled gene matrix.
//!
//! [`GeneMatrix`] stores a row-major dense matrix of `f64` values
//! (n_genes × n_features) with associated gene and feature names. Rows
//! are gene expression profiles; columns are measured features
//! (conditions, timepoints, image statistics, ...). All derived
//! artifacts of the kNN change-detection pipeline — local estimates and
//! score matrices — share this shape.

use crate::error::{ExprshiftError, Result};
use crate::traits::Summarizable;

/// A dense, row-major gene matrix (genes × features).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneMatrix {
    data: Vec<f64>,
    n_genes: usize,
    n_features: usize,
    gene_names: Vec<String>,
    feature_names: Vec<String>,
}

impl GeneMatrix {
    /// Create a matrix from row-major 2D data.
    ///
    /// Each inner `Vec` is one gene (row) with `n_features` values.
    pub fn new(
        data: Vec<Vec<f64>>,
        gene_names: Vec<String>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        let n_genes = data.len();
        let n_features = feature_names.len();

        if gene_names.len() != n_genes {
            return Err(ExprshiftError::InvalidInput(format!(
                "gene_names length ({}) does not match row count ({n_genes})",
                gene_names.len()
            )));
        }

        let mut flat = Vec::with_capacity(n_genes * n_features);
        for (i, row) in data.iter().enumerate() {
            if row.len() != n_features {
                return Err(ExprshiftError::InvalidInput(format!(
                    "row {i} has {} columns, expected {n_features}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }

        Ok(Self {
            data: flat,
            n_genes,
            n_features,
            gene_names,
            feature_names,
        })
    }

    /// Create a matrix from an already-flat row-major buffer.
    pub fn from_flat(
        data: Vec<f64>,
        gene_names: Vec<String>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        let n_genes = gene_names.len();
        let n_features = feature_names.len();
        if data.len() != n_genes * n_features {
            return Err(ExprshiftError::InvalidInput(format!(
                "flat data length ({}) does not match {n_genes} genes \u{00d7} {n_features} features",
                data.len()
            )));
        }
        Ok(Self {
            data,
            n_genes,
            n_features,
            gene_names,
            feature_names,
        })
    }

    /// (n_genes, n_features).
    pub fn shape(&self) -> (usize, usize) {
        (self.n_genes, self.n_features)
    }

    /// Number of genes (rows).
    pub fn n_genes(&self) -> usize {
        self.n_genes
    }

    /// Number of features (columns).
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Get a single value by gene and feature index.
    pub fn get(&self, gene_idx: usize, feature_idx: usize) -> Option<f64> {
        if gene_idx < self.n_genes && feature_idx < self.n_features {
            Some(self.data[gene_idx * self.n_features + feature_idx])
        } else {
            None
        }
    }

    /// A slice of one gene's profile across all features.
    pub fn row(&self, gene_idx: usize) -> Option<&[f64]> {
        if gene_idx < self.n_genes {
            let start = gene_idx * self.n_features;
            Some(&self.data[start..start + self.n_features])
        } else {
            None
        }
    }

    /// The underlying flat data as a slice (row-major, n_genes × n_features).
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Gene names, in row order.
    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    /// Feature names, in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Whether `other` has the same (n_genes, n_features) shape.
    pub fn same_shape(&self, other: &GeneMatrix) -> bool {
        self.n_genes == other.n_genes && self.n_features == other.n_features
    }
}

impl Summarizable for GeneMatrix {
    fn summary(&self) -> String {
        format!(
            "GeneMatrix: {} genes \u{00d7} {} features",
            self.n_genes, self.n_features
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> GeneMatrix {
        GeneMatrix::new(
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            vec!["YAL001C".into(), "YAL002W".into()],
            vec!["f1".into(), "f2".into(), "f3".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_construction() {
        let m = sample_matrix();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.gene_names().len(), 2);
    }

    #[test]
    fn test_name_count_mismatch() {
        let result = GeneMatrix::new(
            vec![vec![1.0, 2.0]],
            vec!["g1".into(), "g2".into()], // 2 names, 1 row
            vec!["f1".into(), "f2".into()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_ragged_row() {
        let result = GeneMatrix::new(
            vec![vec![1.0, 2.0], vec![3.0]], // second row too short
            vec!["g1".into(), "g2".into()],
            vec!["f1".into(), "f2".into()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_flat_length_check() {
        let result = GeneMatrix::from_flat(
            vec![1.0, 2.0, 3.0],
            vec!["g1".into(), "g2".into()],
            vec!["f1".into(), "f2".into()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_get_and_row() {
        let m = sample_matrix();
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(m.row(2), None);
    }

    #[test]
    fn test_same_shape() {
        let a = sample_matrix();
        let b = sample_matrix();
        assert!(a.same_shape(&b));
    }
}
