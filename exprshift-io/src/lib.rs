//! File formats for the exprshift kNN change-detection ecosystem.
//!
//! Currently a single format: tab-separated gene matrices (feature
//! headers in the first row, gene identifiers in the first column).

pub mod gene_matrix;

pub use gene_matrix::{
    parse_gene_matrix_str, read_gene_matrix, write_gene_matrix, write_gene_matrix_string,
};
