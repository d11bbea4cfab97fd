//! Matrix module: dense and row-compressed sparse storage.

pub mod dense;
pub use dense::DenseMatrix;
pub mod sparse;
pub use sparse::{CompressedRows, SparseRowMatrix};
