//! Cross-format vector and matrix operations.
//!
//! Operands are passed as any reference convertible into the tagged variants
//! of [`operand`]; each implementation matches the operand formats from the
//! most specific algorithm to the most general one and fails with
//! `UnsupportedOperand` when nothing matches.
//!
//! Rust does not allow a destination to be borrowed mutably while it is also
//! read, so the aliased forms (`z` is `y`) are separate `*_in_place` methods.

use std::ops::Range;

use crate::core::pair::IndexValuePair;
use crate::error::Result;
use crate::matrix::DenseMatrix;

pub mod kernels;
pub mod operand;
pub use operand::{MatrixMut, MatrixRef, VectorMut, VectorRef};

pub mod sequential;
pub use sequential::SequentialBlas;

mod level2;

/// Norm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Norm {
    /// Sum of absolute values; maximum column sum for matrices.
    One,
    /// Euclidean norm. Not available for matrices.
    Two,
    Frobenius,
    /// Largest absolute value; maximum row sum for matrices.
    Infinity,
}

/// Vector-vector operations and reductions.
pub trait VectorOps {
    /// Set every entry of `x` to zero.
    fn zero<'a>(&self, x: impl Into<VectorMut<'a>>) -> Result<()>;

    /// Set every logical position of `x` to `alpha`.
    fn fill<'a>(&self, alpha: f64, x: impl Into<VectorMut<'a>>) -> Result<()>;

    /// `y ← x`. `y` is zeroed first, then receives the active entries of `x`.
    fn copy<'a, 'b>(&self, x: impl Into<VectorRef<'a>>, y: impl Into<VectorMut<'b>>) -> Result<()>;

    /// `y ← x` restricted to positions in `range`; all other positions of
    /// `y` are zero.
    fn copy_range<'a, 'b>(
        &self,
        x: impl Into<VectorRef<'a>>,
        y: impl Into<VectorMut<'b>>,
        range: Range<usize>,
    ) -> Result<()>;

    /// `x ← alpha·x`
    fn scale<'a>(&self, alpha: f64, x: impl Into<VectorMut<'a>>) -> Result<()>;

    /// `y ← alpha·x`
    fn scale_copy<'a, 'b>(
        &self,
        alpha: f64,
        x: impl Into<VectorRef<'a>>,
        y: impl Into<VectorMut<'b>>,
    ) -> Result<()>;

    /// `z ← alpha·x + beta·y`
    fn add<'a, 'b, 'c>(
        &self,
        alpha: f64,
        x: impl Into<VectorRef<'a>>,
        beta: f64,
        y: impl Into<VectorRef<'b>>,
        z: impl Into<VectorMut<'c>>,
    ) -> Result<()>;

    /// `y ← alpha·x + beta·y`
    fn add_in_place<'a, 'b>(
        &self,
        alpha: f64,
        x: impl Into<VectorRef<'a>>,
        beta: f64,
        y: impl Into<VectorMut<'b>>,
    ) -> Result<()>;

    fn dot<'a, 'b>(&self, x: impl Into<VectorRef<'a>>, y: impl Into<VectorRef<'b>>) -> Result<f64>;

    /// `Frobenius` and `Two` agree for vectors.
    fn norm<'a>(&self, x: impl Into<VectorRef<'a>>, kind: Norm) -> Result<f64>;

    /// Number of nonzero entries.
    fn cardinality<'a>(&self, x: impl Into<VectorRef<'a>>) -> Result<usize>;

    /// Entries of `x` selected by the configured `GatherPolicy`, in
    /// increasing position order.
    fn gather<'a>(&self, x: impl Into<VectorRef<'a>>) -> Result<IndexValuePair>;

    /// Values of `x` at `positions`.
    fn gather_at<'a>(&self, positions: &[usize], x: impl Into<VectorRef<'a>>) -> Result<IndexValuePair>;

    /// Zero `y`, then write the entries of `pair`. Every position is checked
    /// before `y` is touched.
    fn scatter<'a>(&self, pair: &IndexValuePair, y: impl Into<VectorMut<'a>>) -> Result<()>;

    /// Logical values of `x`.
    fn to_vec<'a>(&self, x: impl Into<VectorRef<'a>>) -> Result<Vec<f64>>;

    /// Overwrite `y` with `values`; sparse storage keeps only the nonzeros.
    fn set_from_slice<'a>(&self, values: &[f64], y: impl Into<VectorMut<'a>>) -> Result<()>;
}

/// Matrix operations: copies, matrix-vector products, rank-1 updates, norms.
pub trait MatrixOps {
    fn zero_matrix<'a>(&self, a: impl Into<MatrixMut<'a>>) -> Result<()>;

    /// `B ← A`. `B` is zeroed first; sparse destinations must have room for
    /// every nonzero of `A`.
    fn copy_matrix<'a, 'b>(&self, a: impl Into<MatrixRef<'a>>, b: impl Into<MatrixMut<'b>>) -> Result<()>;

    /// `B ← A` restricted to the block `rows × cols`.
    fn copy_matrix_range<'a, 'b>(
        &self,
        a: impl Into<MatrixRef<'a>>,
        b: impl Into<MatrixMut<'b>>,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<()>;

    fn scale_matrix<'a>(&self, alpha: f64, a: impl Into<MatrixMut<'a>>) -> Result<()>;

    /// `A[i, i] += alpha` along the main diagonal.
    fn add_diagonal<'a>(&self, alpha: f64, a: impl Into<MatrixMut<'a>>) -> Result<()>;

    /// `B ← Aᵗ`
    fn transpose<'a, 'b>(&self, a: impl Into<MatrixRef<'a>>, b: impl Into<MatrixMut<'b>>) -> Result<()>;

    fn matrix_norm<'a>(&self, a: impl Into<MatrixRef<'a>>, kind: Norm) -> Result<f64>;

    /// `A += alpha·x·yᵗ`, touching only entries where `x[i]` and `y[j]` are
    /// both nonzero.
    fn rank1_update<'a, 'b, 'c>(
        &self,
        alpha: f64,
        x: impl Into<VectorRef<'a>>,
        y: impl Into<VectorRef<'b>>,
        a: impl Into<MatrixMut<'c>>,
    ) -> Result<()>;

    /// `z ← alpha·A·x + beta·y`
    fn multiply_add<'a, 'b, 'c, 'd>(
        &self,
        alpha: f64,
        a: impl Into<MatrixRef<'a>>,
        x: impl Into<VectorRef<'b>>,
        beta: f64,
        y: impl Into<VectorRef<'c>>,
        z: impl Into<VectorMut<'d>>,
    ) -> Result<()>;

    /// `y ← alpha·A·x + beta·y`
    fn multiply_add_in_place<'a, 'b, 'c>(
        &self,
        alpha: f64,
        a: impl Into<MatrixRef<'a>>,
        x: impl Into<VectorRef<'b>>,
        beta: f64,
        y: impl Into<VectorMut<'c>>,
    ) -> Result<()>;

    /// `z ← alpha·Aᵗ·x + beta·y`
    fn transpose_multiply_add<'a, 'b, 'c, 'd>(
        &self,
        alpha: f64,
        a: impl Into<MatrixRef<'a>>,
        x: impl Into<VectorRef<'b>>,
        beta: f64,
        y: impl Into<VectorRef<'c>>,
        z: impl Into<VectorMut<'d>>,
    ) -> Result<()>;

    /// `y ← alpha·Aᵗ·x + beta·y`
    fn transpose_multiply_add_in_place<'a, 'b, 'c>(
        &self,
        alpha: f64,
        a: impl Into<MatrixRef<'a>>,
        x: impl Into<VectorRef<'b>>,
        beta: f64,
        y: impl Into<VectorMut<'c>>,
    ) -> Result<()>;

    /// Number of nonzero entries.
    fn matrix_cardinality<'a>(&self, a: impl Into<MatrixRef<'a>>) -> Result<usize>;

    /// Dense copy of `A`.
    fn to_dense_matrix<'a>(&self, a: impl Into<MatrixRef<'a>>) -> Result<DenseMatrix>;
}
