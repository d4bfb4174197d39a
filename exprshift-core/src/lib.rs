//! Shared primitives for the exprshift kNN change-detection ecosystem.
//!
//! `exprshift-core` provides the foundation the other exprshift crates
//! build on:
//!
//! - **Error types** — [`ExprshiftError`] and [`Result`] for structured error handling
//! - **Traits** — [`Summarizable`] display summaries and the [`Progress`] observer
//! - **Gene matrix** — [`GeneMatrix`], a dense labelled genes × features matrix

pub mod error;
pub mod matrix;
pub mod traits;

pub use error::{ExprshiftError, Result};
pub use matrix::GeneMatrix;
pub use traits::*;
