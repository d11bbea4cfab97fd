//! Options for the BLAS dispatcher.
//!
//! `BlasOptions` controls whether operand shapes are validated before each
//! multi-operand call and which entries a gather selects.

/// Entries selected by a gather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatherPolicy {
    /// Entries whose value is nonzero.
    #[default]
    NonZero,
    /// Every stored entry; every position of dense storage.
    Stored,
}

/// Dispatcher options.
#[derive(Debug, Clone)]
pub struct BlasOptions {
    /// Validate operand shapes and fail with `DimensionMismatch`.
    /// When off, shape agreement is the caller's responsibility.
    pub check_shapes: bool,

    /// Selection policy for `gather`.
    pub gather: GatherPolicy,
}

impl Default for BlasOptions {
    fn default() -> Self {
        Self { check_shapes: true, gather: GatherPolicy::NonZero }
    }
}
