//! Single-threaded dispatcher: vector operations.
//!
//! Matrix operations live in `level2.rs`; both are implemented on
//! [`SequentialBlas`].

use std::ops::Range;

use log::trace;

use crate::blas::kernels;
use crate::blas::operand::{VectorMut, VectorRef};
use crate::blas::{Norm, VectorOps};
use crate::config::options::{BlasOptions, GatherPolicy};
use crate::core::pair::IndexValuePair;
use crate::core::traits::{ElementalVector, VecShape};
use crate::error::{BlasError, Result};
use crate::vector::SparseVector;

/// Sequential BLAS dispatcher. Holds no state besides its options.
#[derive(Debug, Clone, Default)]
pub struct SequentialBlas {
    options: BlasOptions,
}

impl SequentialBlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BlasOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BlasOptions {
        &self.options
    }

    pub(crate) fn check_len(&self, what: &str, lhs: usize, rhs: usize) -> Result<()> {
        if self.options.check_shapes && lhs != rhs {
            return Err(BlasError::mismatch(what, lhs, rhs));
        }
        Ok(())
    }
}

/// Validate a sub-range of `[0, len)`.
pub(crate) fn check_range(range: &Range<usize>, len: usize) -> Result<()> {
    if range.start > range.end {
        return Err(BlasError::InvalidArgument(format!(
            "reversed range {}..{}",
            range.start, range.end
        )));
    }
    if range.end > len {
        return Err(BlasError::OutOfRange(format!(
            "range {}..{} exceeds length {len}",
            range.start, range.end
        )));
    }
    Ok(())
}

pub(crate) fn zero_vector(x: &mut VectorMut<'_>) {
    match x {
        VectorMut::Dense(x) => x.as_mut_slice().fill(0.0),
        VectorMut::Sparse(x) => x.clear(),
        VectorMut::Block(x) => x.blocks_mut().iter_mut().for_each(|b| b.as_mut_slice().fill(0.0)),
    }
}

pub(crate) fn scale_vector(alpha: f64, x: &mut VectorMut<'_>) {
    match x {
        VectorMut::Dense(x) => kernels::scale(alpha, x.as_mut_slice()),
        VectorMut::Sparse(x) if alpha == 0.0 => x.clear(),
        VectorMut::Sparse(x) => x.scale(alpha),
        VectorMut::Block(x) => {
            for b in x.blocks_mut() {
                kernels::scale(alpha, b.as_mut_slice());
            }
        }
    }
}

// y[i] += alpha * v for every (i, v)
fn accumulate(
    y: &mut VectorMut<'_>,
    alpha: f64,
    entries: impl Iterator<Item = (usize, f64)>,
) -> Result<()> {
    match y {
        VectorMut::Dense(y) => {
            let s = y.as_mut_slice();
            for (i, v) in entries {
                s[i] += alpha * v;
            }
        }
        y => {
            let dst = y.elemental_mut();
            for (i, v) in entries {
                dst.add(i, alpha * v)?;
            }
        }
    }
    Ok(())
}

fn reduce(kind: Norm, values: impl Iterator<Item = f64>) -> f64 {
    match kind {
        Norm::One => kernels::norm1(values),
        Norm::Two | Norm::Frobenius => kernels::norm2(values),
        Norm::Infinity => kernels::norm_inf(values),
    }
}

impl VectorOps for SequentialBlas {
    fn zero<'a>(&self, x: impl Into<VectorMut<'a>>) -> Result<()> {
        zero_vector(&mut x.into());
        Ok(())
    }

    fn fill<'a>(&self, alpha: f64, x: impl Into<VectorMut<'a>>) -> Result<()> {
        match x.into() {
            VectorMut::Dense(x) => x.as_mut_slice().fill(alpha),
            VectorMut::Block(x) => x.blocks_mut().iter_mut().for_each(|b| b.as_mut_slice().fill(alpha)),
            VectorMut::Sparse(x) if alpha == 0.0 => x.clear(),
            VectorMut::Sparse(x) => *x = SparseVector::filled(x.len(), alpha, 0.0),
        }
        Ok(())
    }

    fn copy<'a, 'b>(&self, x: impl Into<VectorRef<'a>>, y: impl Into<VectorMut<'b>>) -> Result<()> {
        let (x, mut y) = (x.into(), y.into());
        self.check_len("copy: length of x vs length of y", x.len(), y.len())?;
        match (x, &mut y) {
            (VectorRef::Dense(x), VectorMut::Dense(y)) => {
                trace!("copy: contiguous");
                y.as_mut_slice().copy_from_slice(x.as_slice());
            }
            (VectorRef::Sparse(x), VectorMut::Sparse(y)) => {
                trace!("copy: sparse clone");
                **y = x.clone();
            }
            (VectorRef::Block(x), VectorMut::Block(y)) if x.same_partition(y) => {
                trace!("copy: per block");
                for (dst, src) in y.blocks_mut().iter_mut().zip(x.blocks()) {
                    dst.as_mut_slice().copy_from_slice(src.as_slice());
                }
            }
            (x, y) => {
                trace!("copy: elemental");
                zero_vector(y);
                accumulate(y, 1.0, x.entries())?;
            }
        }
        Ok(())
    }

    fn copy_range<'a, 'b>(
        &self,
        x: impl Into<VectorRef<'a>>,
        y: impl Into<VectorMut<'b>>,
        range: Range<usize>,
    ) -> Result<()> {
        let (x, mut y) = (x.into(), y.into());
        self.check_len("copy_range: length of x vs length of y", x.len(), y.len())?;
        check_range(&range, x.len())?;
        match (x, &mut y) {
            (VectorRef::Dense(x), VectorMut::Dense(y)) => {
                let dst = y.as_mut_slice();
                dst.fill(0.0);
                dst[range.clone()].copy_from_slice(&x.as_slice()[range]);
            }
            (x, y) => {
                zero_vector(y);
                accumulate(y, 1.0, x.entries().filter(|(i, _)| range.contains(i)))?;
            }
        }
        Ok(())
    }

    fn scale<'a>(&self, alpha: f64, x: impl Into<VectorMut<'a>>) -> Result<()> {
        if alpha != 1.0 {
            scale_vector(alpha, &mut x.into());
        }
        Ok(())
    }

    fn scale_copy<'a, 'b>(
        &self,
        alpha: f64,
        x: impl Into<VectorRef<'a>>,
        y: impl Into<VectorMut<'b>>,
    ) -> Result<()> {
        let mut y = y.into();
        self.copy(x, y.reborrow())?;
        self.scale(alpha, y)
    }

    fn add<'a, 'b, 'c>(
        &self,
        alpha: f64,
        x: impl Into<VectorRef<'a>>,
        beta: f64,
        y: impl Into<VectorRef<'b>>,
        z: impl Into<VectorMut<'c>>,
    ) -> Result<()> {
        let (x, y, mut z) = (x.into(), y.into(), z.into());
        self.check_len("add: length of x vs length of y", x.len(), y.len())?;
        self.check_len("add: length of x vs length of z", x.len(), z.len())?;
        if alpha == 0.0 {
            return self.scale_copy(beta, y, z);
        }
        if beta == 0.0 {
            return self.scale_copy(alpha, x, z);
        }
        let operands = [x.access(), y.access(), z.access()];
        match (x, y, &mut z) {
            (VectorRef::Dense(x), VectorRef::Dense(y), VectorMut::Dense(z)) => {
                trace!("add: contiguous");
                kernels::add(alpha, x.as_slice(), beta, y.as_slice(), z.as_mut_slice());
            }
            (VectorRef::Block(x), VectorRef::Block(y), VectorMut::Block(z))
                if x.same_partition(y) && x.same_partition(z) =>
            {
                trace!("add: per block");
                for ((zb, xb), yb) in z.blocks_mut().iter_mut().zip(x.blocks()).zip(y.blocks()) {
                    kernels::add(alpha, xb.as_slice(), beta, yb.as_slice(), zb.as_mut_slice());
                }
            }
            (_, _, VectorMut::Block(_)) => return Err(BlasError::unsupported("add", &operands)),
            (x, y, z) => {
                trace!("add: accumulate active entries");
                zero_vector(z);
                accumulate(z, alpha, x.entries())?;
                accumulate(z, beta, y.entries())?;
            }
        }
        Ok(())
    }

    fn add_in_place<'a, 'b>(
        &self,
        alpha: f64,
        x: impl Into<VectorRef<'a>>,
        beta: f64,
        y: impl Into<VectorMut<'b>>,
    ) -> Result<()> {
        let (x, mut y) = (x.into(), y.into());
        self.check_len("add: length of x vs length of y", x.len(), y.len())?;
        if alpha == 0.0 {
            return self.scale(beta, y);
        }
        if beta == 0.0 {
            return self.scale_copy(alpha, x, y);
        }
        let operands = [x.access(), y.access()];
        match (x, &mut y) {
            (VectorRef::Dense(x), VectorMut::Dense(y)) => {
                trace!("add_in_place: contiguous");
                kernels::axpby(alpha, x.as_slice(), beta, y.as_mut_slice());
            }
            (VectorRef::Block(x), VectorMut::Block(y)) if x.same_partition(y) => {
                trace!("add_in_place: per block");
                for (yb, xb) in y.blocks_mut().iter_mut().zip(x.blocks()) {
                    kernels::axpby(alpha, xb.as_slice(), beta, yb.as_mut_slice());
                }
            }
            (_, VectorMut::Block(_)) => return Err(BlasError::unsupported("add", &operands)),
            (x, y) => {
                trace!("add_in_place: scale then accumulate active entries");
                scale_vector(beta, y);
                accumulate(y, alpha, x.entries())?;
            }
        }
        Ok(())
    }

    fn dot<'a, 'b>(&self, x: impl Into<VectorRef<'a>>, y: impl Into<VectorRef<'b>>) -> Result<f64> {
        let (x, y) = (x.into(), y.into());
        self.check_len("dot: length of x vs length of y", x.len(), y.len())?;
        let value: f64 = match (x, y) {
            (VectorRef::Dense(x), VectorRef::Dense(y)) => {
                trace!("dot: contiguous");
                kernels::dot(x.as_slice(), y.as_slice())
            }
            (VectorRef::Dense(d), VectorRef::Sparse(s)) | (VectorRef::Sparse(s), VectorRef::Dense(d)) => {
                trace!("dot: sparse positions into contiguous");
                let (positions, values) = s.stored();
                kernels::dot_sparse(d.as_slice(), positions, values)
            }
            (VectorRef::Sparse(x), VectorRef::Sparse(y)) => {
                trace!("dot: sparse merge");
                x.dot(y)?
            }
            (VectorRef::Block(x), VectorRef::Block(y)) if x.same_partition(y) => {
                trace!("dot: per block");
                x.blocks()
                    .iter()
                    .zip(y.blocks())
                    .map(|(a, b)| kernels::dot(a.as_slice(), b.as_slice()))
                    .sum()
            }
            (VectorRef::Block(x), VectorRef::Block(y)) => {
                trace!("dot: block values");
                x.values().zip(y.values()).map(|(a, b)| a * b).sum()
            }
            _ => return Err(BlasError::unsupported("dot", &[x.access(), y.access()])),
        };
        Ok(value)
    }

    fn norm<'a>(&self, x: impl Into<VectorRef<'a>>, kind: Norm) -> Result<f64> {
        let x = x.into();
        Ok(match x.dense_slice() {
            Some(s) => reduce(kind, s.iter().copied()),
            None => reduce(kind, x.entries().map(|(_, v)| v)),
        })
    }

    fn cardinality<'a>(&self, x: impl Into<VectorRef<'a>>) -> Result<usize> {
        Ok(x.into().entries().filter(|&(_, v)| v != 0.0).count())
    }

    fn gather<'a>(&self, x: impl Into<VectorRef<'a>>) -> Result<IndexValuePair> {
        let x = x.into();
        let (positions, values): (Vec<usize>, Vec<f64>) = match self.options.gather {
            GatherPolicy::NonZero => x.entries().filter(|&(_, v)| v != 0.0).unzip(),
            GatherPolicy::Stored => match x {
                VectorRef::Sparse(s) => s.iter().unzip(),
                VectorRef::Dense(d) => d.as_slice().iter().copied().enumerate().unzip(),
                VectorRef::Block(b) => b.values().enumerate().unzip(),
            },
        };
        IndexValuePair::new(positions, values)
    }

    fn gather_at<'a>(&self, positions: &[usize], x: impl Into<VectorRef<'a>>) -> Result<IndexValuePair> {
        let values = x.into().elemental().get_values(positions)?;
        IndexValuePair::new(positions.to_vec(), values)
    }

    fn scatter<'a>(&self, pair: &IndexValuePair, y: impl Into<VectorMut<'a>>) -> Result<()> {
        let mut y = y.into();
        let len = y.len();
        if let Some(&i) = pair.positions().iter().find(|&&i| i >= len) {
            return Err(BlasError::index(i, len));
        }
        zero_vector(&mut y);
        match &mut y {
            VectorMut::Dense(y) => {
                let dst = y.as_mut_slice();
                for (i, v) in pair.iter() {
                    dst[i] = v;
                }
            }
            y => y.elemental_mut().set_values(pair.positions(), pair.values())?,
        }
        Ok(())
    }

    fn to_vec<'a>(&self, x: impl Into<VectorRef<'a>>) -> Result<Vec<f64>> {
        Ok(match x.into() {
            VectorRef::Dense(x) => x.as_slice().to_vec(),
            VectorRef::Sparse(x) => x.to_dense(),
            VectorRef::Block(x) => x.to_vec(),
        })
    }

    fn set_from_slice<'a>(&self, values: &[f64], y: impl Into<VectorMut<'a>>) -> Result<()> {
        let mut y = y.into();
        self.check_len("set_from_slice: values vs length of y", values.len(), y.len())?;
        match &mut y {
            VectorMut::Dense(y) => y.as_mut_slice().copy_from_slice(values),
            VectorMut::Sparse(y) => {
                y.clear();
                for (i, &v) in values.iter().enumerate().filter(|&(_, &v)| v != 0.0) {
                    y.set(i, v)?;
                }
            }
            VectorMut::Block(y) => {
                for (range, block) in y.ranges_mut() {
                    block.as_mut_slice().copy_from_slice(&values[range]);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{BlockVector, DenseVector};
    use approx::assert_relative_eq;

    #[test]
    fn copy_zeroes_destination_first() {
        let blas = SequentialBlas::new();
        let x = SparseVector::from_dense(&[0.0, 2.0, 0.0, 4.0]);
        let mut y = DenseVector::from_vec(vec![9.0; 4]);
        blas.copy(&x, &mut y).unwrap();
        assert_eq!(y.as_slice(), &[0.0, 2.0, 0.0, 4.0]);

        let mut s = SparseVector::new(4);
        s.set(0, 7.0).unwrap();
        blas.copy(&y, &mut s).unwrap();
        assert_eq!(s.to_dense(), vec![0.0, 2.0, 0.0, 4.0]);
        assert_eq!(s.used(), 2);
    }

    #[test]
    fn copy_range_keeps_only_the_window() {
        let blas = SequentialBlas::new();
        let x = DenseVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let mut y = SparseVector::new(4);
        blas.copy_range(&x, &mut y, 1..3).unwrap();
        assert_eq!(y.to_dense(), vec![0.0, 2.0, 3.0, 0.0]);
        let mut d = DenseVector::zeros(4);
        blas.copy_range(&x, &mut d, 2..4).unwrap();
        assert_eq!(d.as_slice(), &[0.0, 0.0, 3.0, 4.0]);
        assert!(matches!(blas.copy_range(&x, &mut d, 3..5), Err(BlasError::OutOfRange(_))));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 3..1;
        assert!(matches!(blas.copy_range(&x, &mut d, reversed), Err(BlasError::InvalidArgument(_))));
    }

    #[test]
    fn add_across_formats() {
        let blas = SequentialBlas::new();
        let x = DenseVector::from_vec(vec![1.0, 2.0, 3.0]);
        let y = SparseVector::from_dense(&[0.0, 10.0, 0.0]);
        let mut z = DenseVector::zeros(3);
        blas.add(2.0, &x, 1.0, &y, &mut z).unwrap();
        assert_eq!(z.as_slice(), &[2.0, 14.0, 6.0]);

        let mut zs = SparseVector::new(3);
        blas.add(1.0, &y, -1.0, &x, &mut zs).unwrap();
        assert_eq!(zs.to_dense(), vec![-1.0, 8.0, -3.0]);
    }

    #[test]
    fn add_in_place_matches_three_operand_form() {
        let blas = SequentialBlas::new();
        let x = SparseVector::from_dense(&[1.0, 0.0, -2.0]);
        let mut y = DenseVector::from_vec(vec![1.0, 1.0, 1.0]);
        let mut z = DenseVector::zeros(3);
        blas.add(3.0, &x, 0.5, &y, &mut z).unwrap();
        blas.add_in_place(3.0, &x, 0.5, &mut y).unwrap();
        assert_eq!(y, z);
    }

    #[test]
    fn add_in_place_with_zero_beta_ignores_old_contents() {
        let blas = SequentialBlas::new();
        let x = DenseVector::from_vec(vec![1.0, -2.0, 3.0]);
        let mut y = DenseVector::from_vec(vec![f64::NAN; 3]);
        blas.add_in_place(2.0, &x, 0.0, &mut y).unwrap();
        assert_eq!(y.as_slice(), &[2.0, -4.0, 6.0]);

        let xb = BlockVector::from_blocks(vec![
            DenseVector::from_vec(vec![1.0; 2]),
            DenseVector::from_vec(vec![1.0]),
        ]);
        let mut yb = BlockVector::from_blocks(vec![
            DenseVector::from_vec(vec![f64::INFINITY; 2]),
            DenseVector::from_vec(vec![f64::NAN]),
        ]);
        blas.add_in_place(-1.0, &xb, 0.0, &mut yb).unwrap();
        assert_eq!(yb.to_vec(), vec![-1.0; 3]);
    }

    #[test]
    fn block_destination_needs_matching_blocks() {
        let blas = SequentialBlas::new();
        let x = BlockVector::new(&[2, 1]);
        let y = DenseVector::zeros(3);
        let mut z = BlockVector::new(&[2, 1]);
        let err = blas.add(1.0, &x, 1.0, &y, &mut z).unwrap_err();
        assert!(matches!(err, BlasError::UnsupportedOperand { op: "add", .. }));
        blas.add(1.0, &x, 1.0, &x.clone(), &mut z).unwrap();
    }

    #[test]
    fn dot_dense_sparse_both_orders() {
        let blas = SequentialBlas::new();
        let d = DenseVector::from_vec(vec![1.0, 2.0, 3.0]);
        let s = SparseVector::from_dense(&[0.0, 4.0, 1.0]);
        assert_relative_eq!(blas.dot(&d, &s).unwrap(), 11.0);
        assert_relative_eq!(blas.dot(&s, &d).unwrap(), 11.0);
        assert_relative_eq!(blas.dot(&s, &s).unwrap(), 17.0);
    }

    #[test]
    fn scale_by_zero_clears_sparse() {
        let blas = SequentialBlas::new();
        let mut s = SparseVector::from_dense(&[1.0, 2.0]);
        blas.scale(0.0, &mut s).unwrap();
        assert_eq!(s.used(), 0);
        assert_eq!(blas.cardinality(&s).unwrap(), 0);
    }

    #[test]
    fn fill_and_set_from_slice() {
        let blas = SequentialBlas::new();
        let mut s = SparseVector::new(3);
        blas.fill(2.0, &mut s).unwrap();
        assert!(s.is_dense());
        blas.set_from_slice(&[0.0, 5.0, 0.0], &mut s).unwrap();
        assert_eq!(s.used(), 1);
        let mut b = BlockVector::new(&[1, 2]);
        blas.set_from_slice(&[1.0, 2.0, 3.0], &mut b).unwrap();
        assert_eq!(blas.to_vec(&b).unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(blas.set_from_slice(&[1.0], &mut b).is_err());
    }

    #[test]
    fn stored_gather_keeps_explicit_zeros() {
        let opts = BlasOptions { gather: GatherPolicy::Stored, ..Default::default() };
        let blas = SequentialBlas::with_options(opts);
        let mut s = SparseVector::new(5);
        s.set(1, 0.0).unwrap();
        s.set(3, 2.0).unwrap();
        let pair = blas.gather(&s).unwrap();
        assert_eq!(pair.positions(), &[1, 3]);
        let nonzero = SequentialBlas::new().gather(&s).unwrap();
        assert_eq!(nonzero.positions(), &[3]);
    }

    #[test]
    fn scatter_checks_positions_before_writing() {
        let blas = SequentialBlas::new();
        let mut y = DenseVector::from_vec(vec![1.0, 1.0]);
        let pair = IndexValuePair::new(vec![0, 5], vec![1.0, 2.0]).unwrap();
        assert!(matches!(blas.scatter(&pair, &mut y), Err(BlasError::OutOfRange(_))));
        assert_eq!(y.as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn unchecked_shapes_skip_validation() {
        let opts = BlasOptions { check_shapes: false, ..Default::default() };
        let blas = SequentialBlas::with_options(opts);
        let x = SparseVector::from_dense(&[1.0, 2.0]);
        let y = SparseVector::from_dense(&[1.0, 2.0, 3.0]);
        // the sparse merge still guards its own lengths
        assert!(matches!(blas.dot(&x, &y), Err(BlasError::DimensionMismatch(_))));
        assert!(!blas.options().check_shapes);
    }
}
