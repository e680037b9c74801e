//! Trove Media - Wrappers over external media toolchains.
//!
//! This crate shells out to tools the user may or may not have installed:
//! - OCR for images (Tesseract CLI)
//! - Audio extraction and media probing (FFmpeg / ffprobe)
//! - Speech transcription (Whisper CLI)
//! - Web video audio download (yt-dlp)
//!
//! Callers decide what a missing tool means; extractors treat it as
//! degraded mode rather than a hard failure.

mod error;
mod ffmpeg;
mod ocr;
mod transcribe;
mod youtube;

pub use error::{MediaError, MediaResult};
pub use ffmpeg::{extract_audio, media_info, MediaInfo};
pub use ocr::{ocr_image, OcrResult};
pub use transcribe::{segments_to_text, transcribe_audio, TranscriptSegment};
pub use youtube::{download_audio, video_metadata, YoutubeMetadata};
