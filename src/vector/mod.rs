//! Vector storage formats: dense, sparse, and block-partitioned.

pub mod block;
pub mod dense;
pub mod sparse;

pub use block::BlockVector;
pub use dense::DenseVector;
pub use sparse::SparseVector;
