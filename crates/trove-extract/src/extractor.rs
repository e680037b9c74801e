//! The extraction capability shared by all modality extractors.

use crate::error::ExtractResult;
use std::path::{Path, PathBuf};

/// Input handed to an extractor by the dispatcher.
#[derive(Debug, Clone)]
pub enum SourceInput {
    /// A local file.
    File(PathBuf),
    /// A web video URL.
    Url(String),
}

impl SourceInput {
    /// The origin string recorded on the source record.
    pub fn origin(&self) -> String {
        match self {
            SourceInput::File(path) => path.to_string_lossy().to_string(),
            SourceInput::Url(url) => url.clone(),
        }
    }

    /// The file path, when the input is local.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceInput::File(path) => Some(path),
            SourceInput::Url(_) => None,
        }
    }
}

/// Normalized output of an extractor.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Plain text content; empty means "no extractable content".
    pub text: String,
    /// Best-effort modality-specific attributes.
    pub metadata: serde_json::Value,
    /// True when an optional toolchain was unavailable and the extraction
    /// ran with reduced fidelity.
    pub degraded: bool,
}

impl Extraction {
    pub fn new(text: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            text: text.into(),
            metadata,
            degraded: false,
        }
    }

    /// A degraded-mode result: processed, reduced fidelity, never failed.
    pub fn degraded(metadata: serde_json::Value) -> Self {
        Self {
            text: String::new(),
            metadata,
            degraded: true,
        }
    }
}

/// Turns a raw input into plain text plus metadata.
///
/// Implementations must fail on malformed or unreadable input, and must
/// return empty text (not an error) for valid input with no content.
pub trait Extractor: Send + Sync {
    fn extract(&self, input: &SourceInput) -> ExtractResult<Extraction>;
}

/// Reject zero-byte files up front; nothing meaningful can be extracted
/// and every downstream tool produces confusing errors for them.
pub(crate) fn require_nonempty(path: &Path, origin: &str) -> ExtractResult<u64> {
    let len = std::fs::metadata(path)
        .map_err(|_| crate::ExtractError::FileNotFound(path.to_path_buf()))?
        .len();
    if len == 0 {
        return Err(crate::ExtractError::failed(origin, "file is empty (0 bytes)"));
    }
    Ok(len)
}
