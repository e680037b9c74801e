//! Error types for querying.

use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while answering a question.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Store error: {0}")]
    Store(#[from] trove_store::StoreError),

    #[error("Synthesis error: {0}")]
    Synthesis(#[from] trove_synth::SynthError),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
}
