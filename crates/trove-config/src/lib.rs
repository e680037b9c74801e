//! Trove Config - Configuration management for Trove.

mod capabilities;
mod config;
mod error;
mod paths;

pub use capabilities::Capabilities;
pub use config::*;
pub use error::{ConfigError, ConfigResult};
pub use paths::AppPaths;
