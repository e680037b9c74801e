//! Core domain types for Trove.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Unique identifier for source records.
pub type RecordId = String;

/// Generate a fresh unique ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Derive a stable record ID from an origin (path or URL).
///
/// Ingesting the same origin twice always maps to the same record,
/// which is what makes `upsert` idempotent.
pub fn record_id_for_origin(origin: &str) -> RecordId {
    let mut hasher = Sha256::new();
    hasher.update(origin.as_bytes());
    let digest = hasher.finalize();
    digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
}

/// Category of input content, determining which extractor applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    Document,
    Image,
    Audio,
    Video,
    YoutubeLink,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Document => "document",
            Modality::Image => "image",
            Modality::Audio => "audio",
            Modality::Video => "video",
            Modality::YoutubeLink => "youtube-link",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "document" => Some(Modality::Document),
            "image" => Some(Modality::Image),
            "audio" => Some(Modality::Audio),
            "video" => Some(Modality::Video),
            "youtube-link" => Some(Modality::YoutubeLink),
            _ => None,
        }
    }

    /// Detect modality from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" | "docx" | "pptx" | "md" | "txt" => Some(Modality::Document),
            "png" | "jpg" | "jpeg" => Some(Modality::Image),
            "mp3" | "wav" => Some(Modality::Audio),
            "mp4" | "mov" => Some(Modality::Video),
            _ => None,
        }
    }

    /// Detect a web video link from URL shape, independent of extension.
    pub fn from_url(url: &str) -> Option<Self> {
        let lower = url.to_lowercase();
        if lower.contains("youtube.com") || lower.contains("youtu.be") {
            Some(Modality::YoutubeLink)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing state of a source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    #[default]
    Pending,
    Processed,
    Failed,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceStatus::Pending => "pending",
            SourceStatus::Processed => "processed",
            SourceStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(SourceStatus::Pending),
            "processed" => Some(SourceStatus::Processed),
            "failed" => Some(SourceStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ingested input and its extracted text.
///
/// `extracted_text` is always defined: an empty string means "processed,
/// no content". `error_detail` is populated only when status is `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: RecordId,
    pub origin: String,
    pub modality: Modality,
    pub raw_metadata: serde_json::Value,
    pub extracted_text: String,
    pub status: SourceStatus,
    pub error_detail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SourceRecord {
    /// Create a pending record for an origin. Ingestion starts here.
    pub fn pending(origin: impl Into<String>, modality: Modality) -> Self {
        let origin = origin.into();
        let now = Utc::now();
        Self {
            id: record_id_for_origin(&origin),
            origin,
            modality,
            raw_metadata: serde_json::json!({}),
            extracted_text: String::new(),
            status: SourceStatus::Pending,
            error_detail: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to processed with the extracted text and metadata.
    pub fn mark_processed(&mut self, text: String, metadata: serde_json::Value) {
        self.extracted_text = text;
        self.raw_metadata = metadata;
        self.status = SourceStatus::Processed;
        self.error_detail = None;
        self.updated_at = Utc::now();
    }

    /// Transition to failed with a descriptive cause.
    pub fn mark_failed(&mut self, detail: impl Into<String>) {
        self.extracted_text = String::new();
        self.status = SourceStatus::Failed;
        self.error_detail = Some(detail.into());
        self.updated_at = Utc::now();
    }
}
