//! Core shape and access traits for seqblas.

use crate::core::access::Access;
use crate::error::{BlasError, Result};

/// Logical length of a vector (fixed after construction).
pub trait VecShape {
    /// Number of logical positions.
    fn len(&self) -> usize;
    /// `true` when the vector has no positions at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Traversal patterns the format supports.
    fn access(&self) -> Access;
}

/// Row and column counts of a matrix (fixed after construction).
pub trait MatShape {
    /// Number of rows.
    fn nrows(&self) -> usize;
    /// Number of columns.
    fn ncols(&self) -> usize;
    /// Traversal patterns the format supports.
    fn access(&self) -> Access;
}

/// Point access by logical index.
pub trait ElementalVector: VecShape {
    /// Value at `i`; positions that are not stored read as zero.
    fn get(&self, i: usize) -> Result<f64>;
    /// Overwrite the value at `i`.
    fn set(&mut self, i: usize, v: f64) -> Result<()>;
    /// Accumulate `v` into position `i`.
    fn add(&mut self, i: usize, v: f64) -> Result<()>;

    fn get_values(&self, index: &[usize]) -> Result<Vec<f64>> {
        index.iter().map(|&i| self.get(i)).collect()
    }

    /// Applied element by element; an error leaves earlier elements applied.
    fn set_values(&mut self, index: &[usize], values: &[f64]) -> Result<()> {
        check_batch(index.len(), values.len())?;
        for (&i, &v) in index.iter().zip(values) {
            self.set(i, v)?;
        }
        Ok(())
    }

    /// Applied element by element; an error leaves earlier elements applied.
    fn add_values(&mut self, index: &[usize], values: &[f64]) -> Result<()> {
        check_batch(index.len(), values.len())?;
        for (&i, &v) in index.iter().zip(values) {
            self.add(i, v)?;
        }
        Ok(())
    }
}

/// Point access by (row, column).
pub trait ElementalMatrix: MatShape {
    fn get(&self, row: usize, col: usize) -> Result<f64>;
    fn set(&mut self, row: usize, col: usize, v: f64) -> Result<()>;
    fn add(&mut self, row: usize, col: usize, v: f64) -> Result<()>;

    /// Values of the `rows × cols` block, row-major.
    fn get_values(&self, rows: &[usize], cols: &[usize]) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(rows.len() * cols.len());
        for &r in rows {
            for &c in cols {
                out.push(self.get(r, c)?);
            }
        }
        Ok(out)
    }

    /// Overwrite the `rows × cols` block from row-major `values`.
    fn set_values(&mut self, rows: &[usize], cols: &[usize], values: &[f64]) -> Result<()> {
        check_batch(rows.len() * cols.len(), values.len())?;
        for (k, (&r, &c)) in rows.iter().flat_map(|r| cols.iter().map(move |c| (r, c))).enumerate() {
            self.set(r, c, values[k])?;
        }
        Ok(())
    }

    /// Accumulate row-major `values` into the `rows × cols` block.
    fn add_values(&mut self, rows: &[usize], cols: &[usize], values: &[f64]) -> Result<()> {
        check_batch(rows.len() * cols.len(), values.len())?;
        for (k, (&r, &c)) in rows.iter().flat_map(|r| cols.iter().map(move |c| (r, c))).enumerate() {
            self.add(r, c, values[k])?;
        }
        Ok(())
    }
}

fn check_batch(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(BlasError::InvalidArgument(format!(
            "batch expects {expected} values, got {got}"
        )));
    }
    Ok(())
}
