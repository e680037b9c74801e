//! Error types for the ingestion pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] trove_store::StoreError),

    #[error("Unsupported modality: {0}")]
    UnsupportedModality(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Extraction failed for {origin}: {message}")]
    ExtractionFailed { origin: String, message: String },
}

impl ExtractError {
    pub(crate) fn failed(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            origin: origin.into(),
            message: message.into(),
        }
    }
}
