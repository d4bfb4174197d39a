//! Structured error types for the exprshift ecosystem.

use thiserror::Error;

/// Unified error type for all exprshift operations.
///
/// Every failure is terminal for the computation that raised it: the
/// pipeline is deterministic, so a retry with the same inputs would fail
/// identically. Variants carry enough context to name the offending
/// gene, feature, or input line.
#[derive(Debug, Error)]
pub enum ExprshiftError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Neighbor count `k` is not smaller than the number of genes.
    #[error("insufficient genes: k = {k} requires more than {n_genes} genes")]
    InsufficientGenes { k: usize, n_genes: usize },

    /// Matrices or index sets of incompatible dimensions.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Zero variance or zero MAD; the score would divide by zero.
    #[error("degenerate spread: zero spread for gene {gene}, feature {feature}")]
    DegenerateSpread { gene: usize, feature: usize },
}

/// Convenience alias used throughout the exprshift ecosystem.
pub type Result<T> = std::result::Result<T, ExprshiftError>;
