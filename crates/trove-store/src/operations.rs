//! Store operations.

pub mod queries;
pub mod records;
pub mod stats;
