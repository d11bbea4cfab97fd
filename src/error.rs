use thiserror::Error;

use crate::core::access::Access;

// Unified error type for seqblas

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BlasError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlasError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("out of range: {0}")]
    OutOfRange(String),
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("unsupported operand combination for {op}: {operands:?}")]
    UnsupportedOperand {
        op: &'static str,
        operands: Vec<Access>,
    },
}

impl BlasError {
    pub(crate) fn index(index: usize, len: usize) -> Self {
        BlasError::OutOfRange(format!("index {index} not in [0, {len})"))
    }

    pub(crate) fn mismatch(what: &str, lhs: usize, rhs: usize) -> Self {
        BlasError::DimensionMismatch(format!("{what}: {lhs} != {rhs}"))
    }

    pub(crate) fn unsupported(op: &'static str, operands: &[Access]) -> Self {
        BlasError::UnsupportedOperand { op, operands: operands.to_vec() }
    }
}
