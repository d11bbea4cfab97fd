//! Matrix operations of the sequential dispatcher.

use std::ops::Range;

use log::trace;

use crate::blas::kernels;
use crate::blas::operand::{MatrixMut, MatrixRef, VectorMut, VectorRef};
use crate::blas::sequential::check_range;
use crate::blas::{MatrixOps, Norm, SequentialBlas};
use crate::core::access::Access;
use crate::core::traits::{ElementalMatrix, MatShape};
use crate::error::{BlasError, Result};
use crate::matrix::DenseMatrix;

fn zero_matrix_in(a: &mut MatrixMut<'_>) {
    match a {
        MatrixMut::Dense(a) => a.fill(0.0),
        MatrixMut::SparseRow(a) => a.clear(),
    }
}

fn write_entries(
    b: &mut MatrixMut<'_>,
    entries: impl Iterator<Item = (usize, usize, f64)>,
) -> Result<()> {
    let dst = b.elemental_mut();
    for (i, j, v) in entries {
        dst.set(i, j, v)?;
    }
    Ok(())
}

// z += A·x
fn accumulate_product(a: MatrixRef<'_>, x: &[f64], z: &mut [f64]) {
    match a {
        MatrixRef::SparseRow(a) => kernels::row_multiply_add(1.0, a, x, 1.0, z),
        MatrixRef::Dense(a) => kernels::column_accumulate(a, x, z),
    }
}

// z += Aᵗ·x
fn accumulate_transpose_product(a: MatrixRef<'_>, x: &[f64], z: &mut [f64]) {
    match a {
        MatrixRef::SparseRow(a) => kernels::row_transpose_accumulate(a, x, z),
        MatrixRef::Dense(a) => kernels::column_transpose_multiply_add(1.0, a, x, 1.0, z),
    }
}

// z ← alpha·z + beta·y, where z holds the unscaled product and does not alias y
fn combine_with_y(alpha: f64, z: &mut [f64], beta: f64, y: &[f64]) {
    if beta == 0.0 {
        kernels::scale(alpha, z);
    } else {
        kernels::axpby(beta, y, alpha, z);
    }
}

// y ← alpha·A·y_in + beta·y in place; alpha is nonzero
fn multiply_accumulate(alpha: f64, a: MatrixRef<'_>, x: &[f64], beta: f64, z: &mut [f64]) {
    match a {
        MatrixRef::SparseRow(a) => {
            trace!("multiply_add: row-compressed, one pass per row");
            kernels::row_multiply_add(alpha, a, x, beta, z);
        }
        MatrixRef::Dense(a) => {
            trace!("multiply_add: dense columns, rescale then accumulate");
            kernels::rescale_accumulate(alpha, beta, z, |z| kernels::column_accumulate(a, x, z));
        }
    }
}

// y ← alpha·Aᵗ·x + beta·y in place; alpha is nonzero
fn transpose_multiply_accumulate(alpha: f64, a: MatrixRef<'_>, x: &[f64], beta: f64, z: &mut [f64]) {
    match a {
        MatrixRef::SparseRow(a) => {
            trace!("transpose_multiply_add: row-compressed scatter, rescale then accumulate");
            kernels::rescale_accumulate(alpha, beta, z, |z| kernels::row_transpose_accumulate(a, x, z));
        }
        MatrixRef::Dense(a) => {
            trace!("transpose_multiply_add: dense columns");
            kernels::column_transpose_multiply_add(alpha, a, x, beta, z);
        }
    }
}

// Contiguous slice of a vector operand; any other format is unsupported.
fn dense_input<'x>(op: &'static str, operands: &[Access], x: VectorRef<'x>) -> Result<&'x [f64]> {
    x.dense_slice().ok_or_else(|| BlasError::unsupported(op, operands))
}

impl SequentialBlas {
    fn check_product(
        &self,
        op: &str,
        inner: (usize, usize),
        outer: (usize, usize),
    ) -> Result<()> {
        self.check_len(&format!("{op}: inner dimension"), inner.0, inner.1)?;
        self.check_len(&format!("{op}: outer dimension"), outer.0, outer.1)
    }
}

impl MatrixOps for SequentialBlas {
    fn zero_matrix<'a>(&self, a: impl Into<MatrixMut<'a>>) -> Result<()> {
        zero_matrix_in(&mut a.into());
        Ok(())
    }

    fn copy_matrix<'a, 'b>(&self, a: impl Into<MatrixRef<'a>>, b: impl Into<MatrixMut<'b>>) -> Result<()> {
        let (a, mut b) = (a.into(), b.into());
        self.check_len("copy_matrix: rows", a.nrows(), b.nrows())?;
        self.check_len("copy_matrix: columns", a.ncols(), b.ncols())?;
        match (a, &mut b) {
            (MatrixRef::Dense(a), MatrixMut::Dense(b)) => {
                trace!("copy_matrix: dense columns");
                for j in 0..a.ncols() {
                    for i in 0..a.nrows() {
                        *b.at_mut(i, j) = a.at(i, j);
                    }
                }
            }
            (a, b) => {
                trace!("copy_matrix: elemental");
                zero_matrix_in(b);
                write_entries(b, a.entries())?;
            }
        }
        Ok(())
    }

    fn copy_matrix_range<'a, 'b>(
        &self,
        a: impl Into<MatrixRef<'a>>,
        b: impl Into<MatrixMut<'b>>,
        rows: Range<usize>,
        cols: Range<usize>,
    ) -> Result<()> {
        let (a, mut b) = (a.into(), b.into());
        self.check_len("copy_matrix_range: rows", a.nrows(), b.nrows())?;
        self.check_len("copy_matrix_range: columns", a.ncols(), b.ncols())?;
        check_range(&rows, a.nrows())?;
        check_range(&cols, a.ncols())?;
        zero_matrix_in(&mut b);
        match a {
            MatrixRef::SparseRow(a) => {
                let entries = rows.flat_map(move |r| {
                    let (c, v) = a.active_row(r);
                    c.iter().zip(v).map(move |(&c, &v)| (r, c, v))
                });
                write_entries(&mut b, entries.filter(|(_, c, _)| cols.contains(c)))
            }
            a => write_entries(
                &mut b,
                a.entries().filter(|(r, c, _)| rows.contains(r) && cols.contains(c)),
            ),
        }
    }

    fn scale_matrix<'a>(&self, alpha: f64, a: impl Into<MatrixMut<'a>>) -> Result<()> {
        if alpha == 1.0 {
            return Ok(());
        }
        match a.into() {
            MatrixMut::Dense(a) => {
                for j in 0..a.ncols() {
                    for i in 0..a.nrows() {
                        let v = a.at_mut(i, j);
                        *v = if alpha == 0.0 { 0.0 } else { alpha * *v };
                    }
                }
            }
            MatrixMut::SparseRow(a) => {
                // the sparsity pattern is kept even for alpha == 0
                for r in 0..a.nrows() {
                    kernels::scale(alpha, a.row_values_mut(r)?);
                }
            }
        }
        Ok(())
    }

    fn add_diagonal<'a>(&self, alpha: f64, a: impl Into<MatrixMut<'a>>) -> Result<()> {
        let mut a = a.into();
        let n = a.nrows().min(a.ncols());
        let dst = a.elemental_mut();
        for i in 0..n {
            dst.add(i, i, alpha)?;
        }
        Ok(())
    }

    fn transpose<'a, 'b>(&self, a: impl Into<MatrixRef<'a>>, b: impl Into<MatrixMut<'b>>) -> Result<()> {
        let (a, mut b) = (a.into(), b.into());
        self.check_len("transpose: rows of B vs columns of A", b.nrows(), a.ncols())?;
        self.check_len("transpose: columns of B vs rows of A", b.ncols(), a.nrows())?;
        match (a, &mut b) {
            (MatrixRef::Dense(a), MatrixMut::Dense(b)) => {
                for j in 0..a.ncols() {
                    for i in 0..a.nrows() {
                        *b.at_mut(j, i) = a.at(i, j);
                    }
                }
            }
            (a, b) => {
                zero_matrix_in(b);
                write_entries(b, a.entries().map(|(i, j, v)| (j, i, v)))?;
            }
        }
        Ok(())
    }

    fn matrix_norm<'a>(&self, a: impl Into<MatrixRef<'a>>, kind: Norm) -> Result<f64> {
        let a = a.into();
        let max_sum = |sums: Vec<f64>| sums.into_iter().fold(0.0, f64::max);
        match kind {
            Norm::One => {
                let mut sums = vec![0.0; a.ncols()];
                for (_, j, v) in a.entries() {
                    sums[j] += v.abs();
                }
                Ok(max_sum(sums))
            }
            Norm::Infinity => {
                let mut sums = vec![0.0; a.nrows()];
                for (i, _, v) in a.entries() {
                    sums[i] += v.abs();
                }
                Ok(max_sum(sums))
            }
            Norm::Frobenius => Ok(kernels::norm2(a.entries().map(|(_, _, v)| v))),
            Norm::Two => Err(BlasError::InvalidArgument(
                "matrix 2-norm needs singular values; use One, Infinity or Frobenius".into(),
            )),
        }
    }

    fn rank1_update<'a, 'b, 'c>(
        &self,
        alpha: f64,
        x: impl Into<VectorRef<'a>>,
        y: impl Into<VectorRef<'b>>,
        a: impl Into<MatrixMut<'c>>,
    ) -> Result<()> {
        let (x, y, mut a) = (x.into(), y.into(), a.into());
        self.check_len("rank1_update: rows of A vs length of x", a.nrows(), x.len())?;
        self.check_len("rank1_update: columns of A vs length of y", a.ncols(), y.len())?;
        if matches!(x, VectorRef::Block(_)) || matches!(y, VectorRef::Block(_)) {
            return Err(BlasError::unsupported("rank1_update", &[x.access(), y.access(), a.access()]));
        }
        if alpha == 0.0 {
            return Ok(());
        }
        let ys: Vec<(usize, f64)> = y.entries().filter(|&(_, v)| v != 0.0).collect();
        let xs = x.entries().filter(|&(_, v)| v != 0.0);
        match &mut a {
            MatrixMut::Dense(a) => {
                trace!("rank1_update: dense destination");
                for (i, xi) in xs {
                    for &(j, yj) in &ys {
                        *a.at_mut(i, j) += alpha * xi * yj;
                    }
                }
            }
            a => {
                trace!("rank1_update: elemental destination");
                let dst = a.elemental_mut();
                for (i, xi) in xs {
                    for &(j, yj) in &ys {
                        dst.add(i, j, alpha * xi * yj)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn multiply_add<'a, 'b, 'c, 'd>(
        &self,
        alpha: f64,
        a: impl Into<MatrixRef<'a>>,
        x: impl Into<VectorRef<'b>>,
        beta: f64,
        y: impl Into<VectorRef<'c>>,
        z: impl Into<VectorMut<'d>>,
    ) -> Result<()> {
        let (a, x, y, mut z) = (a.into(), x.into(), y.into(), z.into());
        self.check_product("multiply_add", (a.ncols(), x.len()), (a.nrows(), y.len()))?;
        self.check_len("multiply_add: length of y vs length of z", y.len(), z.len())?;
        let operands = [a.access(), x.access(), y.access(), z.access()];
        let xs = dense_input("multiply_add", &operands, x)?;
        let ys = dense_input("multiply_add", &operands, y)?;
        let zs = z
            .dense_slice_mut()
            .ok_or_else(|| BlasError::unsupported("multiply_add", &operands))?;
        if alpha == 0.0 {
            zs.copy_from_slice(ys);
            kernels::scale(beta, zs);
            return Ok(());
        }
        trace!("multiply_add: separate destination, accumulate then combine with y");
        zs.fill(0.0);
        accumulate_product(a, xs, zs);
        combine_with_y(alpha, zs, beta, ys);
        Ok(())
    }

    fn multiply_add_in_place<'a, 'b, 'c>(
        &self,
        alpha: f64,
        a: impl Into<MatrixRef<'a>>,
        x: impl Into<VectorRef<'b>>,
        beta: f64,
        y: impl Into<VectorMut<'c>>,
    ) -> Result<()> {
        let (a, x, mut y) = (a.into(), x.into(), y.into());
        self.check_product("multiply_add", (a.ncols(), x.len()), (a.nrows(), y.len()))?;
        let operands = [a.access(), x.access(), y.access()];
        let xs = dense_input("multiply_add", &operands, x)?;
        let ys = y
            .dense_slice_mut()
            .ok_or_else(|| BlasError::unsupported("multiply_add", &operands))?;
        if alpha == 0.0 {
            kernels::scale(beta, ys);
            return Ok(());
        }
        if beta == 0.0 {
            ys.fill(0.0);
        }
        multiply_accumulate(alpha, a, xs, beta, ys);
        Ok(())
    }

    fn transpose_multiply_add<'a, 'b, 'c, 'd>(
        &self,
        alpha: f64,
        a: impl Into<MatrixRef<'a>>,
        x: impl Into<VectorRef<'b>>,
        beta: f64,
        y: impl Into<VectorRef<'c>>,
        z: impl Into<VectorMut<'d>>,
    ) -> Result<()> {
        let (a, x, y, mut z) = (a.into(), x.into(), y.into(), z.into());
        self.check_product("transpose_multiply_add", (a.nrows(), x.len()), (a.ncols(), y.len()))?;
        self.check_len("transpose_multiply_add: length of y vs length of z", y.len(), z.len())?;
        let operands = [a.access(), x.access(), y.access(), z.access()];
        let xs = dense_input("transpose_multiply_add", &operands, x)?;
        let ys = dense_input("transpose_multiply_add", &operands, y)?;
        let zs = z
            .dense_slice_mut()
            .ok_or_else(|| BlasError::unsupported("transpose_multiply_add", &operands))?;
        if alpha == 0.0 {
            zs.copy_from_slice(ys);
            kernels::scale(beta, zs);
            return Ok(());
        }
        trace!("transpose_multiply_add: separate destination, accumulate then combine with y");
        zs.fill(0.0);
        accumulate_transpose_product(a, xs, zs);
        combine_with_y(alpha, zs, beta, ys);
        Ok(())
    }

    fn transpose_multiply_add_in_place<'a, 'b, 'c>(
        &self,
        alpha: f64,
        a: impl Into<MatrixRef<'a>>,
        x: impl Into<VectorRef<'b>>,
        beta: f64,
        y: impl Into<VectorMut<'c>>,
    ) -> Result<()> {
        let (a, x, mut y) = (a.into(), x.into(), y.into());
        self.check_product("transpose_multiply_add", (a.nrows(), x.len()), (a.ncols(), y.len()))?;
        let operands = [a.access(), x.access(), y.access()];
        let xs = dense_input("transpose_multiply_add", &operands, x)?;
        let ys = y
            .dense_slice_mut()
            .ok_or_else(|| BlasError::unsupported("transpose_multiply_add", &operands))?;
        if alpha == 0.0 {
            kernels::scale(beta, ys);
            return Ok(());
        }
        if beta == 0.0 {
            ys.fill(0.0);
        }
        transpose_multiply_accumulate(alpha, a, xs, beta, ys);
        Ok(())
    }

    fn matrix_cardinality<'a>(&self, a: impl Into<MatrixRef<'a>>) -> Result<usize> {
        let a = a.into();
        Ok(a.entries().filter(|&(_, _, v)| v != 0.0).count())
    }

    fn to_dense_matrix<'a>(&self, a: impl Into<MatrixRef<'a>>) -> Result<DenseMatrix> {
        Ok(match a.into() {
            MatrixRef::Dense(a) => a.clone(),
            MatrixRef::SparseRow(a) => {
                let mut out = DenseMatrix::zeros(a.nrows(), a.ncols());
                for (i, j, v) in a.entries() {
                    *out.at_mut(i, j) = v;
                }
                out
            }
        })
    }
}
