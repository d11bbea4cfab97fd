//! Row-compressed sparse matrix with a fixed per-row capacity.
//!
//! Row `r` owns the slots `offsets[r]..offsets[r + 1]` of the shared
//! `columns`/`values` arrays; the first `used[r]` of them are active and their
//! columns are strictly increasing. A row never grows past its slots:
//! inserting a new column into a full row fails with `OutOfRange`. Banded and
//! other structural matrices have a known nonzero pattern, so running out of
//! room is reported rather than silently reallocated.

use std::ops::Range;

use log::trace;

use crate::core::access::Access;
use crate::core::pair::IndexValuePair;
use crate::core::traits::{ElementalMatrix, MatShape};
use crate::error::{BlasError, Result};

#[derive(Debug, Clone)]
pub struct SparseRowMatrix {
    nrows: usize,
    ncols: usize,
    offsets: Vec<usize>,
    columns: Vec<usize>,
    values: Vec<f64>,
    used: Vec<usize>,
    compact: bool,
}

/// Tight row-compressed export: row `r` is `entries[offsets[r]..offsets[r + 1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedRows {
    pub offsets: Vec<usize>,
    pub entries: IndexValuePair,
}

impl CompressedRows {
    /// Columns and values of row `r`.
    pub fn row(&self, r: usize) -> Result<IndexValuePair> {
        let nrows = self.offsets.len().saturating_sub(1);
        if r >= nrows {
            return Err(BlasError::OutOfRange(format!("row {r} not in [0, {nrows})")));
        }
        self.entries.slice(self.offsets[r]..self.offsets[r + 1])
    }
}

impl SparseRowMatrix {
    /// `nrows × ncols` matrix with room for `nz_per_row` entries in every row.
    pub fn new(nrows: usize, ncols: usize, nz_per_row: usize) -> Self {
        Self::from_capacities(nrows, ncols, std::iter::repeat_n(nz_per_row, nrows))
    }

    /// `nrows × ncols` matrix with `capacities[r]` slots for row `r`.
    pub fn with_row_capacities(nrows: usize, ncols: usize, capacities: &[usize]) -> Result<Self> {
        if capacities.len() != nrows {
            return Err(BlasError::InvalidArgument(format!(
                "{} row capacities given for {nrows} rows",
                capacities.len()
            )));
        }
        Ok(Self::from_capacities(nrows, ncols, capacities.iter().copied()))
    }

    fn from_capacities(nrows: usize, ncols: usize, capacities: impl Iterator<Item = usize>) -> Self {
        let mut offsets = Vec::with_capacity(nrows + 1);
        offsets.push(0);
        for c in capacities {
            offsets.push(offsets[offsets.len() - 1] + c);
        }
        let total = offsets[nrows];
        Self {
            nrows,
            ncols,
            offsets,
            columns: vec![0; total],
            values: vec![0.0; total],
            used: vec![0; nrows],
            compact: total == 0,
        }
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.used.iter().sum()
    }

    /// Slots allocated to row `r`.
    pub fn row_capacity(&self, r: usize) -> Result<usize> {
        self.check_row(r)?;
        Ok(self.slots(r))
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Active columns and values of row `r`.
    pub fn row_entries(&self, r: usize) -> Result<(&[usize], &[f64])> {
        self.check_row(r)?;
        Ok(self.active_row(r))
    }

    /// Active values of row `r`, mutable. The sparsity structure stays fixed.
    pub fn row_values_mut(&mut self, r: usize) -> Result<&mut [f64]> {
        self.check_row(r)?;
        let span = self.active(r);
        Ok(&mut self.values[span])
    }

    // Active columns and values of row `r`; `r < nrows`.
    pub(crate) fn active_row(&self, r: usize) -> (&[usize], &[f64]) {
        let span = self.active(r);
        (&self.columns[span.clone()], &self.values[span])
    }

    /// Copy of row `r` as a column/value pair.
    pub fn row(&self, r: usize) -> Result<IndexValuePair> {
        self.check_row(r)?;
        Ok(IndexValuePair::from_block(&self.columns, &self.values, self.active(r)))
    }

    /// Every stored entry as `(row, column, value)`, row by row.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.nrows).flat_map(move |r| {
            let (cols, vals) = self.active_row(r);
            cols.iter().zip(vals).map(move |(&c, &v)| (r, c, v))
        })
    }

    /// Drop every entry; row capacities are kept.
    pub fn clear(&mut self) {
        self.used.iter_mut().for_each(|u| *u = 0);
        self.compact = self.columns.is_empty();
    }

    /// Collapse each listed row to the single entry `(row, row) = diagonal`,
    /// or to no entries when `row >= ncols`.
    pub fn zero_rows(&mut self, rows: &[usize], diagonal: f64) -> Result<()> {
        for &r in rows {
            self.check_row(r)?;
            self.compact = false;
            if r < self.ncols {
                if self.slots(r) == 0 {
                    return Err(BlasError::OutOfRange(format!(
                        "row {r} has no capacity for its diagonal"
                    )));
                }
                let start = self.offsets[r];
                self.columns[start] = r;
                self.values[start] = diagonal;
                self.used[r] = 1;
            } else {
                self.used[r] = 0;
            }
        }
        Ok(())
    }

    /// Reallocate the backing arrays to exactly the stored entries. Idempotent.
    pub fn compact(&mut self) {
        if self.compact {
            return;
        }
        let nnz = self.nnz();
        trace!("compacting {}x{} row matrix: {} -> {} slots", self.nrows, self.ncols, self.columns.len(), nnz);
        let mut offsets = Vec::with_capacity(self.nrows + 1);
        let mut columns = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        offsets.push(0);
        for r in 0..self.nrows {
            let span = self.active(r);
            columns.extend_from_slice(&self.columns[span.clone()]);
            values.extend_from_slice(&self.values[span]);
            offsets.push(columns.len());
        }
        self.offsets = offsets;
        self.columns = columns;
        self.values = values;
        self.compact = true;
    }

    /// Compact, then export the tight row-compressed arrays.
    pub fn compressed(&mut self) -> CompressedRows {
        self.compact();
        CompressedRows {
            offsets: self.offsets.clone(),
            entries: IndexValuePair::from_block(&self.columns, &self.values, 0..self.values.len()),
        }
    }

    fn slots(&self, r: usize) -> usize {
        self.offsets[r + 1] - self.offsets[r]
    }

    fn active(&self, r: usize) -> Range<usize> {
        self.offsets[r]..self.offsets[r] + self.used[r]
    }

    fn check_row(&self, r: usize) -> Result<()> {
        if r >= self.nrows {
            return Err(BlasError::OutOfRange(format!("row {r} not in [0, {})", self.nrows)));
        }
        Ok(())
    }

    fn check_col(&self, c: usize) -> Result<()> {
        if c >= self.ncols {
            return Err(BlasError::OutOfRange(format!("column {c} not in [0, {})", self.ncols)));
        }
        Ok(())
    }

    // Slot of (r, c) in the backing arrays, inserting a zero entry if absent.
    fn resolve_slot(&mut self, r: usize, c: usize) -> Result<usize> {
        self.check_row(r)?;
        let span = self.active(r);
        let k = match self.columns[span.clone()].binary_search(&c) {
            Ok(k) => return Ok(span.start + k),
            Err(k) => span.start + k,
        };
        self.check_col(c)?;
        if span.end == self.offsets[r + 1] {
            return Err(BlasError::OutOfRange(format!(
                "row {r} capacity of {} entries exhausted inserting column {c}",
                self.slots(r)
            )));
        }
        self.columns.copy_within(k..span.end, k + 1);
        self.values.copy_within(k..span.end, k + 1);
        self.columns[k] = c;
        self.values[k] = 0.0;
        self.used[r] += 1;
        self.compact = false;
        Ok(k)
    }
}

impl MatShape for SparseRowMatrix {
    fn nrows(&self) -> usize {
        self.nrows
    }

    fn ncols(&self) -> usize {
        self.ncols
    }

    fn access(&self) -> Access {
        Access::SPARSE_ROW | Access::ELEMENTAL
    }
}

impl ElementalMatrix for SparseRowMatrix {
    fn get(&self, row: usize, col: usize) -> Result<f64> {
        let (cols, vals) = self.row_entries(row)?;
        match cols.binary_search(&col) {
            Ok(k) => Ok(vals[k]),
            Err(_) => {
                self.check_col(col)?;
                Ok(0.0)
            }
        }
    }

    fn set(&mut self, row: usize, col: usize, v: f64) -> Result<()> {
        let k = self.resolve_slot(row, col)?;
        self.values[k] = v;
        Ok(())
    }

    fn add(&mut self, row: usize, col: usize, v: f64) -> Result<()> {
        let k = self.resolve_slot(row, col)?;
        self.values[k] += v;
        Ok(())
    }
}

/// Logical equality: same shape and the same stored entries row by row,
/// regardless of row capacities or compaction.
impl PartialEq for SparseRowMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && (0..self.nrows).all(|r| self.active_row(r) == other.active_row(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_within_capacity() {
        let mut a = SparseRowMatrix::new(3, 4, 2);
        a.set(0, 3, 1.0).unwrap();
        a.set(0, 1, 2.0).unwrap();
        a.add(0, 1, 0.5).unwrap();
        assert_eq!(a.get(0, 1).unwrap(), 2.5);
        assert_eq!(a.get(0, 3).unwrap(), 1.0);
        assert_eq!(a.get(0, 0).unwrap(), 0.0);
        assert_eq!(a.row_entries(0).unwrap().0, &[1, 3]);
        assert!(matches!(a.get(0, 4), Err(BlasError::OutOfRange(_))));
        assert!(matches!(a.get(3, 0), Err(BlasError::OutOfRange(_))));
    }

    #[test]
    fn full_row_rejects_new_column_and_leaves_others_alone() {
        let mut a = SparseRowMatrix::new(2, 3, 1);
        a.set(0, 0, 1.0).unwrap();
        a.set(1, 2, 5.0).unwrap();
        let err = a.set(0, 1, 2.0).unwrap_err();
        assert!(matches!(err, BlasError::OutOfRange(_)));
        // existing entries can still be updated
        a.set(0, 0, 4.0).unwrap();
        assert_eq!(a.get(0, 0).unwrap(), 4.0);
        assert_eq!(a.get(1, 2).unwrap(), 5.0);
        assert_eq!(a.nnz(), 2);
    }

    #[test]
    fn per_row_capacities() {
        let mut a = SparseRowMatrix::with_row_capacities(3, 3, &[0, 3, 1]).unwrap();
        assert_eq!(a.row_capacity(1).unwrap(), 3);
        assert!(a.set(0, 0, 1.0).is_err());
        for c in 0..3 {
            a.set(1, c, c as f64).unwrap();
        }
        assert!(SparseRowMatrix::with_row_capacities(3, 3, &[1, 1]).is_err());
    }

    #[test]
    fn zero_rows_collapses_to_diagonal() {
        let mut a = SparseRowMatrix::new(3, 2, 2);
        a.set(1, 0, 3.0).unwrap();
        a.set(1, 1, 4.0).unwrap();
        a.set(2, 0, 1.0).unwrap();
        a.zero_rows(&[1, 2], 9.0).unwrap();
        assert_eq!(a.get(1, 1).unwrap(), 9.0);
        assert_eq!(a.get(1, 0).unwrap(), 0.0);
        // row 2 has no diagonal inside a 2-column matrix
        assert_eq!(a.row_entries(2).unwrap().0.len(), 0);
        assert!(!a.is_compact());
    }

    #[test]
    fn compact_keeps_values_and_tightens_offsets() {
        let mut a = SparseRowMatrix::new(3, 3, 3);
        a.set(0, 2, 1.0).unwrap();
        a.set(2, 0, 2.0).unwrap();
        a.set(2, 2, 3.0).unwrap();
        let rows = a.compressed();
        assert!(a.is_compact());
        assert_eq!(rows.offsets, vec![0, 1, 1, 3]);
        assert_eq!(rows.entries.positions(), &[2, 0, 2]);
        assert_eq!(rows.row(2).unwrap().values(), &[2.0, 3.0]);
        assert!(matches!(rows.row(3), Err(BlasError::OutOfRange(_))));
        assert_eq!(a.get(2, 2).unwrap(), 3.0);
        a.compact();
        assert_eq!(a.compressed(), rows);
        // compaction made every row full
        assert!(a.set(1, 1, 1.0).is_err());
    }

    #[test]
    fn entries_iterate_row_major() {
        let mut a = SparseRowMatrix::new(2, 2, 2);
        a.set(1, 1, 4.0).unwrap();
        a.set(0, 1, 2.0).unwrap();
        a.set(1, 0, 3.0).unwrap();
        let e: Vec<_> = a.entries().collect();
        assert_eq!(e, vec![(0, 1, 2.0), (1, 0, 3.0), (1, 1, 4.0)]);
    }

    #[test]
    fn row_accessors_reject_bad_rows() {
        let mut a = SparseRowMatrix::new(2, 2, 1);
        assert!(matches!(a.row_capacity(2), Err(BlasError::OutOfRange(_))));
        assert!(matches!(a.row_entries(2), Err(BlasError::OutOfRange(_))));
        assert!(matches!(a.row_values_mut(5), Err(BlasError::OutOfRange(_))));
        assert!(matches!(a.row(2), Err(BlasError::OutOfRange(_))));
        a.set(1, 0, 2.0).unwrap();
        a.row_values_mut(1).unwrap()[0] = 3.0;
        assert_eq!(a.get(1, 0).unwrap(), 3.0);
    }

    #[test]
    fn equality_ignores_capacity_and_compaction() {
        let mut a = SparseRowMatrix::new(2, 3, 3);
        let mut b = SparseRowMatrix::with_row_capacities(2, 3, &[1, 2]).unwrap();
        for m in [&mut a, &mut b] {
            m.set(0, 2, 1.0).unwrap();
            m.set(1, 0, -1.0).unwrap();
        }
        assert_eq!(a, b);
        a.compact();
        assert_eq!(a, b);
        b.set(1, 1, 4.0).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, SparseRowMatrix::new(2, 2, 3));
    }
}
