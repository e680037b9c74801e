//! Trove Core - Domain types for the multimodal knowledge base.

mod error;
mod types;

pub use error::{Error, Result};
pub use types::*;
