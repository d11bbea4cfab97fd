//! seqblas: sequential BLAS over dense, sparse, and block storage
//!
//! This crate provides vector and matrix storage formats (dense, sorted sparse,
//! block-partitioned, row-compressed sparse, and Faer-backed dense matrices) and a
//! dispatcher that runs the most specific algorithm for every pairing of formats.

pub mod blas;
pub mod config;
pub mod core;
pub mod error;
pub mod matrix;
pub mod vector;

// Re-exports for convenience
pub use blas::{MatrixMut, MatrixOps, MatrixRef, Norm, SequentialBlas, VectorMut, VectorOps, VectorRef};
pub use config::{BlasOptions, GatherPolicy};
pub use crate::core::{Access, ElementalMatrix, ElementalVector, IndexValuePair, MatShape, VecShape};
pub use error::{BlasError, Result};
pub use matrix::{CompressedRows, DenseMatrix, SparseRowMatrix};
pub use vector::{BlockVector, DenseVector, SparseVector};
