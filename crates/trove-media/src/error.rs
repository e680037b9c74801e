//! Error types for media processing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors from external media tools.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Tool not found: {tool}. Please install it.")]
    ToolNotFound { tool: String },

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
