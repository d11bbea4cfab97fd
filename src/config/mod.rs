//! Dispatcher configuration.

pub mod options;
pub use options::{BlasOptions, GatherPolicy};
