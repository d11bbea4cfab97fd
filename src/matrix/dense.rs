//! Dense matrix on top of Faer.
//!
//! `DenseMatrix` wraps a column-major `faer::Mat<f64>`, so whole columns are
//! the natural traversal unit.

use faer::Mat;

use crate::core::access::Access;
use crate::core::traits::{ElementalMatrix, MatShape};
use crate::error::{BlasError, Result};

#[derive(Debug, Clone)]
pub struct DenseMatrix {
    inner: Mat<f64>,
}

impl DenseMatrix {
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self { inner: Mat::zeros(nrows, ncols) }
    }

    pub fn identity(n: usize) -> Self {
        Self { inner: Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 }) }
    }

    pub fn from_fn(nrows: usize, ncols: usize, f: impl FnMut(usize, usize) -> f64) -> Self {
        Self { inner: Mat::from_fn(nrows, ncols, f) }
    }

    /// Construct from row-major storage.
    pub fn from_row_major(nrows: usize, ncols: usize, data: &[f64]) -> Result<Self> {
        if data.len() != nrows * ncols {
            return Err(BlasError::InvalidArgument(format!(
                "{} values given for a {nrows}x{ncols} matrix",
                data.len()
            )));
        }
        Ok(Self::from_fn(nrows, ncols, |i, j| data[i * ncols + j]))
    }

    pub fn as_mat(&self) -> &Mat<f64> {
        &self.inner
    }

    pub fn into_inner(self) -> Mat<f64> {
        self.inner
    }

    /// Overwrite every entry with `v`.
    pub fn fill(&mut self, v: f64) {
        for j in 0..self.inner.ncols() {
            for i in 0..self.inner.nrows() {
                self.inner[(i, j)] = v;
            }
        }
    }

    /// Unchecked read; `i` and `j` must be in bounds.
    #[inline]
    pub(crate) fn at(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    /// Unchecked write access; `i` and `j` must be in bounds.
    #[inline]
    pub(crate) fn at_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.inner[(i, j)]
    }

    fn check(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.inner.nrows() || j >= self.inner.ncols() {
            return Err(BlasError::OutOfRange(format!(
                "({i}, {j}) outside {}x{} matrix",
                self.inner.nrows(),
                self.inner.ncols()
            )));
        }
        Ok(())
    }
}

impl From<Mat<f64>> for DenseMatrix {
    fn from(inner: Mat<f64>) -> Self {
        Self { inner }
    }
}

impl PartialEq for DenseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.inner.nrows() == other.inner.nrows()
            && self.inner.ncols() == other.inner.ncols()
            && (0..self.inner.ncols())
                .all(|j| (0..self.inner.nrows()).all(|i| self.at(i, j) == other.at(i, j)))
    }
}

impl MatShape for DenseMatrix {
    fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    fn access(&self) -> Access {
        Access::DENSE_COLUMN | Access::ELEMENTAL
    }
}

impl ElementalMatrix for DenseMatrix {
    fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check(row, col)?;
        Ok(self.at(row, col))
    }

    fn set(&mut self, row: usize, col: usize, v: f64) -> Result<()> {
        self.check(row, col)?;
        *self.at_mut(row, col) = v;
        Ok(())
    }

    fn add(&mut self, row: usize, col: usize, v: f64) -> Result<()> {
        self.check(row, col)?;
        *self.at_mut(row, col) += v;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_construction() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(a.get(0, 2).unwrap(), 3.0);
        assert_eq!(a.get(1, 0).unwrap(), 4.0);
        assert_eq!(a.as_mat()[(1, 1)], 5.0);
        assert!(DenseMatrix::from_row_major(2, 2, &[1.0]).is_err());
    }

    #[test]
    fn elemental_access_is_bounds_checked() {
        let mut a = DenseMatrix::identity(2);
        a.add(0, 1, 2.0).unwrap();
        assert_eq!(a.get(0, 1).unwrap(), 2.0);
        assert!(matches!(a.set(2, 0, 1.0), Err(BlasError::OutOfRange(_))));
        a.fill(0.0);
        assert_eq!(a, DenseMatrix::zeros(2, 2));
    }
}
