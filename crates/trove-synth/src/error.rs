//! Error types for answer synthesis.

use thiserror::Error;

/// Errors that can occur when talking to the synthesizer.
#[derive(Error, Debug)]
pub enum SynthError {
    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The configured model is not available.
    #[error("Model not found: {model}. Run 'ollama pull {model}' to download it.")]
    ModelNotFound { model: String },

    /// Synthesizer server is not running.
    #[error("Synthesizer is not running at {host}. Start it with 'ollama serve'.")]
    ServerNotRunning { host: String },

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// All retry attempts exhausted on transient failures.
    #[error("Synthesis unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    /// Whether retrying could plausibly succeed.
    ///
    /// Connect failures, timeouts, and server-side (5xx) responses are
    /// transient. Missing models and 4xx rejections are configuration
    /// problems; retrying them only delays the error message.
    pub fn is_transient(&self) -> bool {
        match self {
            SynthError::Timeout { .. } | SynthError::ServerNotRunning { .. } | SynthError::Http(_) => {
                true
            }
            SynthError::ApiError { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
