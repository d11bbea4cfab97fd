//! Parallel position/value arrays.
//!
//! `IndexValuePair` is the canonical export of a sparse vector and the result of
//! a gather. It is also used for row slices cut out of the shared backing arrays
//! of a row-compressed matrix.

use std::ops::Range;

use crate::error::{BlasError, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexValuePair {
    positions: Vec<usize>,
    values: Vec<f64>,
}

impl IndexValuePair {
    /// Pair up `positions` and `values`, which must have equal length.
    pub fn new(positions: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        if positions.len() != values.len() {
            return Err(BlasError::InvalidArgument(format!(
                "{} positions paired with {} values",
                positions.len(),
                values.len()
            )));
        }
        Ok(Self { positions, values })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Copy the entries `range` of two parallel slices into a new pair.
    pub(crate) fn from_block(positions: &[usize], values: &[f64], range: Range<usize>) -> Self {
        Self {
            positions: positions[range.clone()].to_vec(),
            values: values[range].to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Contiguous sub-range of the entries, deep-copied.
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.len() {
            return Err(BlasError::OutOfRange(format!(
                "entry range {range:?} outside pair of length {}",
                self.len()
            )));
        }
        Ok(Self::from_block(&self.positions, &self.values, range))
    }

    /// `true` when positions are strictly increasing.
    pub fn is_sorted(&self) -> bool {
        self.positions.windows(2).all(|w| w[0] < w[1])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.positions.iter().copied().zip(self.values.iter().copied())
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<f64>) {
        (self.positions, self.values)
    }
}
