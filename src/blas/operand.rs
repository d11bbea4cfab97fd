//! Tagged operand variants.
//!
//! The set of storage formats is closed, so the dispatcher takes its operands
//! as enums over the concrete formats and matches on them. `From` impls let
//! callers pass `&x` / `&mut y` directly.

use crate::core::access::Access;
use crate::core::traits::{ElementalMatrix, ElementalVector, MatShape, VecShape};
use crate::matrix::{DenseMatrix, SparseRowMatrix};
use crate::vector::{BlockVector, DenseVector, SparseVector};

/// Shared view of any vector format.
#[derive(Debug, Clone, Copy)]
pub enum VectorRef<'a> {
    Dense(&'a DenseVector),
    Sparse(&'a SparseVector),
    Block(&'a BlockVector),
}

/// Exclusive view of any vector format.
#[derive(Debug)]
pub enum VectorMut<'a> {
    Dense(&'a mut DenseVector),
    Sparse(&'a mut SparseVector),
    Block(&'a mut BlockVector),
}

/// Shared view of any matrix format.
#[derive(Debug, Clone, Copy)]
pub enum MatrixRef<'a> {
    Dense(&'a DenseMatrix),
    SparseRow(&'a SparseRowMatrix),
}

/// Exclusive view of any matrix format.
#[derive(Debug)]
pub enum MatrixMut<'a> {
    Dense(&'a mut DenseMatrix),
    SparseRow(&'a mut SparseRowMatrix),
}

impl<'a> VectorRef<'a> {
    pub fn len(&self) -> usize {
        self.elemental().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn access(&self) -> Access {
        self.elemental().access()
    }

    pub fn elemental(&self) -> &'a dyn ElementalVector {
        match *self {
            VectorRef::Dense(x) => x,
            VectorRef::Sparse(x) => x,
            VectorRef::Block(x) => x,
        }
    }

    /// The contiguous slice, for dense storage.
    pub fn dense_slice(&self) -> Option<&'a [f64]> {
        match *self {
            VectorRef::Dense(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    /// Active entries: stored entries of a sparse vector, nonzero positions
    /// of dense and block storage.
    pub fn entries(self) -> Box<dyn Iterator<Item = (usize, f64)> + 'a> {
        match self {
            VectorRef::Dense(x) => Box::new(nonzeros(x.as_slice().iter().copied())),
            VectorRef::Sparse(x) => Box::new(x.iter()),
            VectorRef::Block(x) => Box::new(nonzeros(x.values())),
        }
    }
}

impl<'a> VectorMut<'a> {
    pub fn len(&self) -> usize {
        self.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn access(&self) -> Access {
        self.as_ref().access()
    }

    pub fn as_ref(&self) -> VectorRef<'_> {
        match self {
            VectorMut::Dense(x) => VectorRef::Dense(x),
            VectorMut::Sparse(x) => VectorRef::Sparse(x),
            VectorMut::Block(x) => VectorRef::Block(x),
        }
    }

    pub fn reborrow(&mut self) -> VectorMut<'_> {
        match self {
            VectorMut::Dense(x) => VectorMut::Dense(x),
            VectorMut::Sparse(x) => VectorMut::Sparse(x),
            VectorMut::Block(x) => VectorMut::Block(x),
        }
    }

    pub fn elemental_mut(&mut self) -> &mut dyn ElementalVector {
        match self {
            VectorMut::Dense(x) => &mut **x,
            VectorMut::Sparse(x) => &mut **x,
            VectorMut::Block(x) => &mut **x,
        }
    }

    pub fn dense_slice_mut(&mut self) -> Option<&mut [f64]> {
        match self {
            VectorMut::Dense(x) => Some(x.as_mut_slice()),
            _ => None,
        }
    }
}

impl<'a> MatrixRef<'a> {
    pub fn nrows(&self) -> usize {
        self.elemental().nrows()
    }

    pub fn ncols(&self) -> usize {
        self.elemental().ncols()
    }

    pub fn access(&self) -> Access {
        self.elemental().access()
    }

    pub fn elemental(&self) -> &'a dyn ElementalMatrix {
        match *self {
            MatrixRef::Dense(a) => a,
            MatrixRef::SparseRow(a) => a,
        }
    }

    /// Active entries as `(row, column, value)`: stored entries of sparse
    /// storage, nonzero entries of dense storage.
    pub fn entries(self) -> Box<dyn Iterator<Item = (usize, usize, f64)> + 'a> {
        match self {
            MatrixRef::SparseRow(a) => Box::new(a.entries()),
            MatrixRef::Dense(a) => Box::new((0..a.ncols()).flat_map(move |j| {
                (0..a.nrows()).filter_map(move |i| {
                    let v = a.at(i, j);
                    (v != 0.0).then_some((i, j, v))
                })
            })),
        }
    }
}

impl<'a> MatrixMut<'a> {
    pub fn nrows(&self) -> usize {
        self.as_ref().nrows()
    }

    pub fn ncols(&self) -> usize {
        self.as_ref().ncols()
    }

    pub fn access(&self) -> Access {
        self.as_ref().access()
    }

    pub fn as_ref(&self) -> MatrixRef<'_> {
        match self {
            MatrixMut::Dense(a) => MatrixRef::Dense(a),
            MatrixMut::SparseRow(a) => MatrixRef::SparseRow(a),
        }
    }

    pub fn elemental_mut(&mut self) -> &mut dyn ElementalMatrix {
        match self {
            MatrixMut::Dense(a) => &mut **a,
            MatrixMut::SparseRow(a) => &mut **a,
        }
    }
}

fn nonzeros(values: impl Iterator<Item = f64>) -> impl Iterator<Item = (usize, f64)> {
    values.enumerate().filter(|&(_, v)| v != 0.0)
}

macro_rules! operand_from {
    (mut $target:ident, $variant:ident, $ty:ty) => {
        impl<'a> From<&'a mut $ty> for $target<'a> {
            fn from(x: &'a mut $ty) -> Self {
                $target::$variant(x)
            }
        }
    };
    ($target:ident, $variant:ident, $ty:ty) => {
        impl<'a> From<&'a $ty> for $target<'a> {
            fn from(x: &'a $ty) -> Self {
                $target::$variant(x)
            }
        }
    };
}

operand_from!(VectorRef, Dense, DenseVector);
operand_from!(VectorRef, Sparse, SparseVector);
operand_from!(VectorRef, Block, BlockVector);
operand_from!(mut VectorMut, Dense, DenseVector);
operand_from!(mut VectorMut, Sparse, SparseVector);
operand_from!(mut VectorMut, Block, BlockVector);
operand_from!(MatrixRef, Dense, DenseMatrix);
operand_from!(MatrixRef, SparseRow, SparseRowMatrix);
operand_from!(mut MatrixMut, Dense, DenseMatrix);
operand_from!(mut MatrixMut, SparseRow, SparseRowMatrix);
