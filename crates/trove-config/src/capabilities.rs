//! Probe for optional external toolchains.
//!
//! Run once at process start and threaded into the extractors, so no
//! extractor re-probes per file. A missing tool puts the matching
//! extractor into degraded mode rather than failing ingestion.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Availability of the local extraction toolchains.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Capabilities {
    /// OCR engine for images.
    pub tesseract: bool,
    /// Audio extraction from video containers.
    pub ffmpeg: bool,
    /// Media info probing.
    pub ffprobe: bool,
    /// Speech-to-text.
    pub whisper: bool,
    /// Web video audio download.
    pub ytdlp: bool,
}

impl Capabilities {
    /// Probe the PATH for each external tool.
    pub fn probe() -> Self {
        let caps = Self {
            tesseract: which::which("tesseract").is_ok(),
            ffmpeg: which::which("ffmpeg").is_ok(),
            ffprobe: which::which("ffprobe").is_ok(),
            whisper: which::which("whisper").is_ok(),
            ytdlp: which::which("yt-dlp").is_ok(),
        };
        debug!(?caps, "probed external toolchains");
        caps
    }

    /// Everything present, no degraded paths.
    pub fn all() -> Self {
        Self {
            tesseract: true,
            ffmpeg: true,
            ffprobe: true,
            whisper: true,
            ytdlp: true,
        }
    }

    /// Nothing present, every optional toolchain degraded.
    pub fn none() -> Self {
        Self {
            tesseract: false,
            ffmpeg: false,
            ffprobe: false,
            whisper: false,
            ytdlp: false,
        }
    }

    /// Pairs of tool name and availability, for status output.
    pub fn as_pairs(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("tesseract", self.tesseract),
            ("ffmpeg", self.ffmpeg),
            ("ffprobe", self.ffprobe),
            ("whisper", self.whisper),
            ("yt-dlp", self.ytdlp),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_does_not_panic() {
        let caps = Capabilities::probe();
        let _ = caps.as_pairs();
    }

    #[test]
    fn test_fixed_capabilities() {
        assert!(Capabilities::all().whisper);
        assert!(!Capabilities::none().tesseract);
    }
}
