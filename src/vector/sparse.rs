//! Sparse vector over sorted (position, value) pairs.
//!
//! The backing arrays `positions` and `values` have equal length (the
//! capacity); the first `used` slots are active and `positions[..used]` is
//! strictly increasing. Inserting into a full vector doubles the capacity
//! (0 grows to 1), so point insertion is amortized O(1) apart from the suffix
//! shift. `compact` trims the backing arrays to exactly `used` slots.
//!
//! # Two modes
//!
//! The type is used in two ways:
//!
//! - **sparse**: only touched positions are stored and the capacity grows on
//!   demand;
//! - **dense over sparse backing**: every logical position is stored (see
//!   [`SparseVector::filled`] and [`SparseVector::is_dense`]).
//!
//! The dense-style helpers (`sum`, `min`, `max`, `map`, elementwise
//! arithmetic, equality, indexing) are defined on *logical* values, so a
//! position that is not stored always reads as zero. They give the same
//! answer in both modes and never assume the backing arrays cover `[0, len)`.
//!
//! An operation whose result at an unstored position is not zero materializes
//! every position, as `map` does when `f(0) != 0`. Division by zero is one of
//! them: unstored positions become `0 / 0 = NaN`, so the result is in dense
//! mode.

use std::cmp::Ordering;
use std::ops::{Div, Index, Mul, Neg};

use log::trace;

use crate::core::access::Access;
use crate::core::pair::IndexValuePair;
use crate::core::traits::{ElementalVector, VecShape};
use crate::error::{BlasError, Result};

static ZERO: f64 = 0.0;

#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    len: usize,
    positions: Vec<usize>,
    values: Vec<f64>,
    used: usize,
}

impl SparseVector {
    /// Empty vector of logical length `len`, no preallocation.
    pub fn new(len: usize) -> Self {
        Self::with_capacity(len, 0)
    }

    /// Empty vector with room for `nz` entries before the first reallocation.
    pub fn with_capacity(len: usize, nz: usize) -> Self {
        Self { len, positions: vec![0; nz], values: vec![0.0; nz], used: 0 }
    }

    /// Store the nonzero entries of `values`.
    pub fn from_dense(values: &[f64]) -> Self {
        let (positions, data): (Vec<usize>, Vec<f64>) = values
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, v)| v != 0.0)
            .unzip();
        let used = positions.len();
        Self { len: values.len(), positions, values: data, used }
    }

    /// Every position stored: `a[0] = value`, `a[i] = a[i - 1] + increment`.
    pub fn filled(len: usize, value: f64, increment: f64) -> Self {
        let positions = (0..len).collect();
        let values = (0..len).map(|i| value + increment * i as f64).collect();
        Self { len, positions, values, used: len }
    }

    /// Adopt a pair whose positions are strictly increasing and below `len`.
    pub fn from_pair(len: usize, pair: IndexValuePair) -> Result<Self> {
        if !pair.is_sorted() {
            return Err(BlasError::InvalidArgument(
                "pair positions must be strictly increasing".into(),
            ));
        }
        if let Some(&last) = pair.positions().last() {
            if last >= len {
                return Err(BlasError::index(last, len));
            }
        }
        let used = pair.len();
        let (positions, values) = pair.into_parts();
        Ok(Self { len, positions, values, used })
    }

    /// Number of stored entries.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Length of the backing arrays.
    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    /// `true` when every logical position is stored.
    pub fn is_dense(&self) -> bool {
        self.used == self.len
    }

    /// Active positions and values, without compacting.
    pub fn stored(&self) -> (&[usize], &[f64]) {
        (&self.positions[..self.used], &self.values[..self.used])
    }

    /// Active values, mutable. The sparsity structure stays fixed.
    pub fn stored_values_mut(&mut self) -> &mut [f64] {
        &mut self.values[..self.used]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (p, v) = self.stored();
        p.iter().copied().zip(v.iter().copied())
    }

    /// Trim the backing arrays to exactly `used` slots. Idempotent.
    pub fn compact(&mut self) {
        if self.used < self.positions.len() {
            trace!("compacting sparse vector: {} -> {} slots", self.positions.len(), self.used);
            self.positions.truncate(self.used);
            self.positions.shrink_to_fit();
            self.values.truncate(self.used);
            self.values.shrink_to_fit();
        }
    }

    /// Compact, then expose the raw backing arrays.
    pub fn raw_parts(&mut self) -> (&[usize], &[f64]) {
        self.compact();
        (&self.positions, &self.values)
    }

    /// Compact, then copy out the canonical position/value pair.
    pub fn pair(&mut self) -> IndexValuePair {
        self.compact();
        IndexValuePair::from_block(&self.positions, &self.values, 0..self.used)
    }

    /// Set every entry of `pair`; existing entries elsewhere are kept.
    pub fn set_pair(&mut self, pair: &IndexValuePair) -> Result<()> {
        self.set_values(pair.positions(), pair.values())
    }

    /// Drop all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.used = 0;
    }

    /// Every logical value becomes zero.
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Every logical value becomes `value`. Nonzero values switch to dense mode.
    pub fn fill(&mut self, value: f64) {
        self.fill_with(value, 0.0);
    }

    /// `a[0] = value`, `a[i] = a[i - 1] + increment`, in place.
    pub fn fill_with(&mut self, value: f64, increment: f64) {
        if value == 0.0 && increment == 0.0 {
            self.clear();
            return;
        }
        *self = Self::filled(self.len, value, increment);
    }

    /// Remove the entry at `i`, returning its value if it was stored.
    pub fn remove(&mut self, i: usize) -> Result<Option<f64>> {
        self.check(i)?;
        match self.search(i) {
            Ok(k) => {
                let v = self.values[k];
                self.positions.copy_within(k + 1..self.used, k);
                self.values.copy_within(k + 1..self.used, k);
                self.used -= 1;
                Ok(Some(v))
            }
            Err(_) => Ok(None),
        }
    }

    /// Logical values as a dense `Vec`.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.len];
        for (i, v) in self.iter() {
            out[i] = v;
        }
        out
    }

    fn check(&self, i: usize) -> Result<()> {
        if i >= self.len {
            return Err(BlasError::index(i, self.len));
        }
        Ok(())
    }

    fn search(&self, i: usize) -> std::result::Result<usize, usize> {
        self.positions[..self.used].binary_search(&i)
    }

    // Slot holding position i, inserting a zero entry if absent.
    fn slot(&mut self, i: usize) -> Result<usize> {
        let k = match self.search(i) {
            Ok(k) => return Ok(k),
            Err(k) => k,
        };
        self.check(i)?;
        if self.used == self.positions.len() {
            self.grow();
        }
        self.positions.copy_within(k..self.used, k + 1);
        self.values.copy_within(k..self.used, k + 1);
        self.positions[k] = i;
        self.values[k] = 0.0;
        self.used += 1;
        Ok(k)
    }

    fn grow(&mut self) {
        let cap = match self.positions.len() {
            0 => 1,
            n => 2 * n,
        };
        trace!("growing sparse vector backing: {} -> {} slots", self.positions.len(), cap);
        self.positions.resize(cap, 0);
        self.values.resize(cap, 0.0);
    }

    // ---- dense-style helpers over logical values ----

    /// Apply `f` to every logical value.
    ///
    /// When `f(0) == 0` only stored entries are visited and the sparsity
    /// pattern is kept; otherwise every position is materialized.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> SparseVector {
        let f0 = f(0.0);
        if f0 == 0.0 {
            let mut out = self.clone();
            out.stored_values_mut().iter_mut().for_each(|v| *v = f(*v));
            return out;
        }
        let mut values = vec![f0; self.len];
        for (i, v) in self.iter() {
            values[i] = f(v);
        }
        SparseVector { len: self.len, positions: (0..self.len).collect(), values, used: self.len }
    }

    /// Absolute value of every entry, in place.
    pub fn abs(&mut self) {
        self.stored_values_mut().iter_mut().for_each(|v| *v = v.abs());
    }

    pub fn sqrt(&self) -> SparseVector {
        self.map(f64::sqrt)
    }

    /// Natural logarithm; positions that are not stored become `-inf`.
    pub fn ln(&self) -> SparseVector {
        self.map(f64::ln)
    }

    /// Exponential; positions that are not stored become `1`.
    pub fn exp(&self) -> SparseVector {
        self.map(f64::exp)
    }

    /// Multiply every entry by `alpha`, in place.
    pub fn scale(&mut self, alpha: f64) {
        if alpha == 1.0 {
            return;
        }
        self.stored_values_mut().iter_mut().for_each(|v| *v *= alpha);
    }

    /// Divide every logical value by `alpha`, in place.
    pub fn divide(&mut self, alpha: f64) {
        if 0.0 / alpha == 0.0 {
            self.scale(1.0 / alpha);
        } else {
            *self = self.map(|v| v / alpha);
        }
    }

    pub fn sum(&self) -> f64 {
        self.stored().1.iter().sum()
    }

    /// Smallest logical value; `None` for a zero-length vector.
    pub fn min(&self) -> Option<f64> {
        self.extreme(f64::min)
    }

    /// Largest logical value; `None` for a zero-length vector.
    pub fn max(&self) -> Option<f64> {
        self.extreme(f64::max)
    }

    fn extreme(&self, pick: fn(f64, f64) -> f64) -> Option<f64> {
        if self.len == 0 {
            return None;
        }
        let start = if self.is_dense() { None } else { Some(0.0) };
        self.stored().1.iter().copied().fold(start, |acc, v| Some(acc.map_or(v, |a| pick(a, v))))
    }

    /// `self += other`, elementwise.
    pub fn add_vector(&mut self, other: &SparseVector) -> Result<()> {
        self.add_scaled(1.0, other)
    }

    /// `self -= other`, elementwise.
    pub fn sub_vector(&mut self, other: &SparseVector) -> Result<()> {
        self.add_scaled(-1.0, other)
    }

    /// `self += alpha·other`, touching only the positions stored in `other`.
    pub fn add_scaled(&mut self, alpha: f64, other: &SparseVector) -> Result<()> {
        self.check_len(other)?;
        if alpha == 0.0 {
            return Ok(());
        }
        for (i, v) in other.iter() {
            ElementalVector::add(self, i, alpha * v)?;
        }
        Ok(())
    }

    /// `self *= other`, elementwise. Entries absent from `other` are dropped.
    pub fn mul_vector(&mut self, other: &SparseVector) -> Result<()> {
        self.check_len(other)?;
        let mut kept = 0;
        for k in 0..self.used {
            if let Ok(j) = other.search(self.positions[k]) {
                self.positions[kept] = self.positions[k];
                self.values[kept] = self.values[k] * other.values[j];
                kept += 1;
            }
        }
        self.used = kept;
        Ok(())
    }

    /// Dot product by merging the two sorted position lists.
    pub fn dot(&self, other: &SparseVector) -> Result<f64> {
        self.check_len(other)?;
        let (pa, va) = self.stored();
        let (pb, vb) = other.stored();
        let (mut a, mut b, mut acc) = (0, 0, 0.0);
        while a < pa.len() && b < pb.len() {
            match pa[a].cmp(&pb[b]) {
                Ordering::Less => a += 1,
                Ordering::Greater => b += 1,
                Ordering::Equal => {
                    acc += va[a] * vb[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        Ok(acc)
    }

    fn check_len(&self, other: &SparseVector) -> Result<()> {
        if self.len != other.len {
            return Err(BlasError::mismatch("sparse vector lengths", self.len, other.len));
        }
        Ok(())
    }
}

impl VecShape for SparseVector {
    fn len(&self) -> usize {
        self.len
    }

    fn access(&self) -> Access {
        Access::SPARSE | Access::ELEMENTAL
    }
}

impl ElementalVector for SparseVector {
    fn get(&self, i: usize) -> Result<f64> {
        match self.search(i) {
            Ok(k) => Ok(self.values[k]),
            Err(_) => {
                self.check(i)?;
                Ok(0.0)
            }
        }
    }

    fn set(&mut self, i: usize, v: f64) -> Result<()> {
        let k = self.slot(i)?;
        self.values[k] = v;
        Ok(())
    }

    fn add(&mut self, i: usize, v: f64) -> Result<()> {
        let k = self.slot(i)?;
        self.values[k] += v;
        Ok(())
    }
}

/// Logical equality: same length and the same value at every position,
/// regardless of capacity, compaction, or explicitly stored zeros.
impl PartialEq for SparseVector {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        let (pa, va) = self.stored();
        let (pb, vb) = other.stored();
        let (mut a, mut b) = (0, 0);
        loop {
            match (pa.get(a), pb.get(b)) {
                (None, None) => return true,
                (Some(_), None) => {
                    if va[a] != 0.0 {
                        return false;
                    }
                    a += 1;
                }
                (None, Some(_)) => {
                    if vb[b] != 0.0 {
                        return false;
                    }
                    b += 1;
                }
                (Some(i), Some(j)) => match i.cmp(j) {
                    Ordering::Less => {
                        if va[a] != 0.0 {
                            return false;
                        }
                        a += 1;
                    }
                    Ordering::Greater => {
                        if vb[b] != 0.0 {
                            return false;
                        }
                        b += 1;
                    }
                    Ordering::Equal => {
                        if va[a] != vb[b] {
                            return false;
                        }
                        a += 1;
                        b += 1;
                    }
                },
            }
        }
    }
}

/// Logical value at `i`.
///
/// # Panics
/// Panics if `i >= len`.
impl Index<usize> for SparseVector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        assert!(i < self.len, "index {i} out of range for sparse vector of length {}", self.len);
        match self.search(i) {
            Ok(k) => &self.values[k],
            Err(_) => &ZERO,
        }
    }
}

impl Mul<f64> for &SparseVector {
    type Output = SparseVector;

    fn mul(self, alpha: f64) -> SparseVector {
        let mut out = self.clone();
        out.scale(alpha);
        out
    }
}

impl Mul<&SparseVector> for f64 {
    type Output = SparseVector;

    fn mul(self, x: &SparseVector) -> SparseVector {
        x * self
    }
}

impl Div<f64> for &SparseVector {
    type Output = SparseVector;

    fn div(self, alpha: f64) -> SparseVector {
        let mut out = self.clone();
        out.divide(alpha);
        out
    }
}

impl Neg for &SparseVector {
    type Output = SparseVector;

    fn neg(self) -> SparseVector {
        self * -1.0
    }
}

// Binary operators between sparse vectors fail on a length mismatch, so they
// yield a `Result` instead of panicking.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $inplace:ident) => {
        impl std::ops::$trait<&SparseVector> for &SparseVector {
            type Output = Result<SparseVector>;

            fn $method(self, other: &SparseVector) -> Result<SparseVector> {
                let mut out = self.clone();
                out.$inplace(other)?;
                Ok(out)
            }
        }
    };
}

impl_binary_op!(Add, add, add_vector);
impl_binary_op!(Sub, sub, sub_vector);
impl_binary_op!(Mul, mul, mul_vector);
