//! Contiguous dense vector.

use crate::core::access::Access;
use crate::core::traits::{ElementalVector, VecShape};
use crate::error::{BlasError, Result};

/// Every position materialized in one `Vec<f64>`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseVector {
    data: Vec<f64>,
}

impl DenseVector {
    /// All-zero vector of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self { data: vec![0.0; len] }
    }

    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    fn check(&self, i: usize) -> Result<()> {
        if i >= self.data.len() {
            return Err(BlasError::index(i, self.data.len()));
        }
        Ok(())
    }
}

impl From<Vec<f64>> for DenseVector {
    fn from(data: Vec<f64>) -> Self {
        Self::from_vec(data)
    }
}

impl AsRef<[f64]> for DenseVector {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

impl AsMut<[f64]> for DenseVector {
    fn as_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl VecShape for DenseVector {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn access(&self) -> Access {
        Access::CONTIGUOUS | Access::ELEMENTAL
    }
}

impl ElementalVector for DenseVector {
    fn get(&self, i: usize) -> Result<f64> {
        self.check(i)?;
        Ok(self.data[i])
    }

    fn set(&mut self, i: usize, v: f64) -> Result<()> {
        self.check(i)?;
        self.data[i] = v;
        Ok(())
    }

    fn add(&mut self, i: usize, v: f64) -> Result<()> {
        self.check(i)?;
        self.data[i] += v;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_access_is_bounds_checked() {
        let mut x = DenseVector::zeros(3);
        x.set(1, 2.0).unwrap();
        x.add(1, 0.5).unwrap();
        assert_eq!(x.get(1).unwrap(), 2.5);
        assert!(matches!(x.get(3), Err(BlasError::OutOfRange(_))));
        assert!(x.add(7, 1.0).is_err());
    }

    #[test]
    fn batched_set_stops_at_first_failure() {
        let mut x = DenseVector::zeros(3);
        let err = x.set_values(&[0, 5, 2], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, BlasError::OutOfRange(_)));
        assert_eq!(x.as_slice(), &[1.0, 0.0, 0.0]);
    }
}
