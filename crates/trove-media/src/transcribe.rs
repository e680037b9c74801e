//! Audio transcription using Whisper.

use crate::error::{MediaError, MediaResult};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// A segment of transcribed audio.
#[derive(Debug, Clone)]
pub struct TranscriptSegment {
    /// The transcribed text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

#[derive(Debug, Deserialize)]
struct WhisperJsonOutput {
    #[allow(dead_code)]
    text: String,
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    text: String,
    start: f64,
    end: f64,
}

/// Transcribe an audio file using Whisper.
///
/// Requires the `whisper` CLI to be installed (pip install openai-whisper).
/// Silent audio yields an empty segment list, not an error.
pub fn transcribe_audio(
    audio_path: &Path,
    model: &str,
    output_dir: &Path,
) -> MediaResult<Vec<TranscriptSegment>> {
    if !audio_path.exists() {
        return Err(MediaError::FileNotFound(audio_path.to_path_buf()));
    }

    if which::which("whisper").is_err() {
        return Err(MediaError::ToolNotFound {
            tool: "whisper".to_string(),
        });
    }

    info!("Transcribing {:?} with model '{}'", audio_path, model);

    let output = Command::new("whisper")
        .arg(audio_path)
        .args(["--model", model])
        .args(["--output_format", "json"])
        .args(["--output_dir"])
        .arg(output_dir)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::Transcription(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let stem = audio_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let json_path = output_dir.join(format!("{}.json", stem));

    if !json_path.exists() {
        return Err(MediaError::Transcription(
            "Whisper output file not found".to_string(),
        ));
    }

    let json_content = std::fs::read_to_string(&json_path)?;
    let whisper_output: WhisperJsonOutput = serde_json::from_str(&json_content)
        .map_err(|e| MediaError::Parse(format!("Failed to parse Whisper output: {}", e)))?;

    let segments: Vec<TranscriptSegment> = whisper_output
        .segments
        .into_iter()
        .map(|s| TranscriptSegment {
            text: s.text.trim().to_string(),
            start: s.start,
            end: s.end,
        })
        .collect();

    debug!("Transcribed {} segments", segments.len());
    Ok(segments)
}

/// Join segments into the full transcript text.
pub fn segments_to_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
