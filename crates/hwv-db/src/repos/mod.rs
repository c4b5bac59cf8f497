//! Repository methods, implemented as `impl HwvDb` blocks per table.

pub mod aggregate;
pub mod submission;
