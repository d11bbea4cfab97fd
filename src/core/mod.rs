//! Shape primitives, access capabilities, and the position/value pair.

pub mod access;
pub mod pair;
pub mod traits;

pub use access::Access;
pub use pair::IndexValuePair;
pub use traits::{ElementalMatrix, ElementalVector, MatShape, VecShape};
