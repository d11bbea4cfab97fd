//! Access capabilities of the storage formats.
//!
//! Every vector and matrix format reports which traversal patterns it supports.
//! The dispatcher picks an algorithm from the capabilities of its operands and
//! reports them back when no algorithm matches.

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Access: u8 {
        /// Every position lives in one contiguous slice.
        const CONTIGUOUS   = 0b0000_0001;
        /// Point get/set/add by logical index.
        const ELEMENTAL    = 0b0000_0010;
        /// Sorted (position, value) pairs of stored entries.
        const SPARSE       = 0b0000_0100;
        /// Partitioned into independently stored blocks.
        const BLOCK        = 0b0000_1000;
        /// Per-row sorted (column, value) slices.
        const SPARSE_ROW   = 0b0001_0000;
        /// Contiguous columns (column-major dense storage).
        const DENSE_COLUMN = 0b0010_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_sets_compose() {
        let dense = Access::CONTIGUOUS | Access::ELEMENTAL;
        assert!(dense.contains(Access::ELEMENTAL));
        assert!(!dense.intersects(Access::SPARSE | Access::BLOCK));
        assert_eq!(format!("{:?}", Access::SPARSE), "Access(SPARSE)");
    }
}
