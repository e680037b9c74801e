//! Audio, video, and web-video extractor built on the media toolchains.

use crate::error::{ExtractError, ExtractResult};
use crate::extractor::{require_nonempty, Extraction, Extractor, SourceInput};
use std::path::Path;
use trove_config::Capabilities;
use trove_media::{segments_to_text, TranscriptSegment};
use tracing::{debug, warn};

/// Extractor for audio files, video files, and web video URLs. The
/// pipeline is transcript-centric: video is reduced to its audio track,
/// web video is downloaded as audio, then everything goes through the
/// same transcription path.
pub struct MediaExtractor {
    caps: Capabilities,
    transcribe: bool,
    whisper_model: String,
}

impl MediaExtractor {
    pub fn new(caps: &Capabilities, transcribe: bool, whisper_model: &str) -> Self {
        Self {
            caps: *caps,
            transcribe,
            whisper_model: whisper_model.to_string(),
        }
    }

    fn missing_tools_for(&self, input: &SourceInput) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match input {
            SourceInput::Url(_) => {
                if !self.caps.ytdlp {
                    missing.push("yt-dlp");
                }
            }
            SourceInput::File(path) => {
                if is_video(path) && !self.caps.ffmpeg {
                    missing.push("ffmpeg");
                }
            }
        }
        if !self.caps.whisper {
            missing.push("whisper");
        }
        missing
    }

    fn transcribe_file(
        &self,
        audio_path: &Path,
        origin: &str,
        work_dir: &Path,
    ) -> ExtractResult<Vec<TranscriptSegment>> {
        trove_media::transcribe_audio(audio_path, &self.whisper_model, work_dir)
            .map_err(|e| ExtractError::failed(origin, format!("transcription failed: {}", e)))
    }

    fn extract_audio_file(&self, path: &Path, origin: &str) -> ExtractResult<Extraction> {
        let work_dir = tempfile::tempdir()?;
        let segments = self.transcribe_file(path, origin, work_dir.path())?;
        let text = segments_to_text(&segments);

        debug!(origin = %origin, segments = segments.len(), "Audio transcribed");

        Ok(Extraction::new(
            text,
            serde_json::json!({
                "format": "audio",
                "segments": segments.len(),
            }),
        ))
    }

    fn extract_video_file(&self, path: &Path, origin: &str) -> ExtractResult<Extraction> {
        // Probe is best-effort; transcript is the payload
        let info = if self.caps.ffprobe {
            trove_media::media_info(path).ok()
        } else {
            None
        };

        let work_dir = tempfile::tempdir()?;
        let audio_path = trove_media::extract_audio(path, work_dir.path())
            .map_err(|e| ExtractError::failed(origin, format!("audio extraction failed: {}", e)))?;
        let segments = self.transcribe_file(&audio_path, origin, work_dir.path())?;
        let text = segments_to_text(&segments);

        let mut metadata = serde_json::json!({
            "format": "video",
            "segments": segments.len(),
        });
        if let Some(info) = info {
            metadata["duration_seconds"] = serde_json::json!(info.duration);
            metadata["width"] = serde_json::json!(info.width);
            metadata["height"] = serde_json::json!(info.height);
            if let Some(codec) = info.video_codec {
                metadata["video_codec"] = serde_json::json!(codec);
            }
        }

        Ok(Extraction::new(text, metadata))
    }

    fn extract_web_video(&self, url: &str) -> ExtractResult<Extraction> {
        let meta = trove_media::video_metadata(url)
            .map_err(|e| ExtractError::failed(url, format!("metadata fetch failed: {}", e)))?;

        let work_dir = tempfile::tempdir()?;
        let audio_path = trove_media::download_audio(url, work_dir.path())
            .map_err(|e| ExtractError::failed(url, format!("download failed: {}", e)))?;
        let segments = self.transcribe_file(&audio_path, url, work_dir.path())?;
        let text = segments_to_text(&segments);

        Ok(Extraction::new(
            text,
            serde_json::json!({
                "format": "youtube",
                "title": meta.title,
                "duration_seconds": meta.duration,
                "segments": segments.len(),
            }),
        ))
    }
}

impl Extractor for MediaExtractor {
    fn extract(&self, input: &SourceInput) -> ExtractResult<Extraction> {
        let origin = input.origin();

        if let Some(path) = input.path() {
            if !path.exists() {
                return Err(ExtractError::FileNotFound(path.to_path_buf()));
            }
            require_nonempty(path, &origin)?;
        }

        let missing = self.missing_tools_for(input);
        if !self.transcribe || !missing.is_empty() {
            let reason = if !self.transcribe {
                "transcription disabled in config".to_string()
            } else {
                format!("missing tools: {}", missing.join(", "))
            };
            warn!(origin = %origin, %reason, "Skipping transcript, recording in degraded mode");
            return Ok(Extraction::degraded(serde_json::json!({
                "format": media_format(input),
                "transcript_skipped": true,
                "skip_reason": reason,
                "missing_tools": missing,
            })));
        }

        match input {
            SourceInput::Url(url) => self.extract_web_video(url),
            SourceInput::File(path) => {
                if is_video(path) {
                    self.extract_video_file(path, &origin)
                } else {
                    self.extract_audio_file(path, &origin)
                }
            }
        }
    }
}

fn is_video(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("mp4") | Some("mov")
    )
}

fn media_format(input: &SourceInput) -> &'static str {
    match input {
        SourceInput::Url(_) => "youtube",
        SourceInput::File(path) if is_video(path) => "video",
        SourceInput::File(_) => "audio",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extractor(caps: Capabilities) -> MediaExtractor {
        MediaExtractor::new(&caps, true, "base")
    }

    #[test]
    fn test_audio_degrades_without_whisper() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.mp3");
        std::fs::write(&path, b"fake mp3 bytes").unwrap();

        let extraction = extractor(Capabilities::none())
            .extract(&SourceInput::File(path))
            .unwrap();

        assert!(extraction.degraded);
        assert_eq!(extraction.metadata["format"], "audio");
        assert_eq!(extraction.metadata["transcript_skipped"], true);
        assert_eq!(extraction.metadata["missing_tools"][0], "whisper");
    }

    #[test]
    fn test_video_reports_both_missing_tools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"fake mp4 bytes").unwrap();

        let extraction = extractor(Capabilities::none())
            .extract(&SourceInput::File(path))
            .unwrap();

        assert!(extraction.degraded);
        assert_eq!(extraction.metadata["format"], "video");
        let missing = extraction.metadata["missing_tools"].as_array().unwrap();
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0], "ffmpeg");
        assert_eq!(missing[1], "whisper");
    }

    #[test]
    fn test_url_degrades_without_ytdlp() {
        let extraction = extractor(Capabilities::none())
            .extract(&SourceInput::Url(
                "https://youtube.com/watch?v=abc".to_string(),
            ))
            .unwrap();

        assert!(extraction.degraded);
        assert_eq!(extraction.metadata["format"], "youtube");
    }

    #[test]
    fn test_degrades_when_transcription_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.mp3");
        std::fs::write(&path, b"fake mp3 bytes").unwrap();

        let extraction = MediaExtractor::new(&Capabilities::all(), false, "base")
            .extract(&SourceInput::File(path))
            .unwrap();

        assert!(extraction.degraded);
        assert_eq!(
            extraction.metadata["skip_reason"],
            "transcription disabled in config"
        );
    }

    #[test]
    fn test_missing_media_file_is_not_found() {
        let err = extractor(Capabilities::none())
            .extract(&SourceInput::File(PathBuf::from("/nope/clip.mp4")))
            .unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound(_)));
    }

    #[test]
    fn test_zero_byte_media_fails_before_degrading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mp3");
        std::fs::File::create(&path).unwrap();

        let err = extractor(Capabilities::none())
            .extract(&SourceInput::File(path))
            .unwrap_err();
        assert!(matches!(err, ExtractError::ExtractionFailed { .. }));
    }
}
