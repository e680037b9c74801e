//! Trove Store - Durable content store for source records, using SQLite.

mod database;
mod error;
mod migrations;
mod operations;

pub use database::Store;
pub use error::{StoreError, StoreResult};
pub use operations::queries::SavedQuery;
pub use operations::stats::StoreStats;
