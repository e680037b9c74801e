//! FFmpeg integration for audio extraction and media probing.

use crate::error::{MediaError, MediaResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Best-effort information about a media file.
#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    /// Duration in seconds.
    pub duration: f64,
    /// Width in pixels (0 for pure audio).
    pub width: u32,
    /// Height in pixels (0 for pure audio).
    pub height: u32,
    /// Video codec, if any.
    pub video_codec: Option<String>,
    /// Audio codec, if any.
    pub audio_codec: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Probe a media file with ffprobe.
pub fn media_info(path: &Path) -> MediaResult<MediaInfo> {
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    if which::which("ffprobe").is_err() {
        return Err(MediaError::ToolNotFound {
            tool: "ffprobe".to_string(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::Ffmpeg(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let probe: FfprobeOutput = serde_json::from_str(&json_str)
        .map_err(|e| MediaError::Parse(format!("Failed to parse ffprobe output: {}", e)))?;

    let video_stream = probe.streams.iter().find(|s| s.codec_type == "video");
    let audio_stream = probe.streams.iter().find(|s| s.codec_type == "audio");

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let (width, height) = video_stream
        .map(|s| (s.width.unwrap_or(0), s.height.unwrap_or(0)))
        .unwrap_or((0, 0));

    Ok(MediaInfo {
        duration,
        width,
        height,
        video_codec: video_stream.and_then(|s| s.codec_name.clone()),
        audio_codec: audio_stream.and_then(|s| s.codec_name.clone()),
    })
}

/// Extract the audio track from a video file.
///
/// Produces mono 16 kHz WAV, the format Whisper expects.
pub fn extract_audio(video_path: &Path, output_dir: &Path) -> MediaResult<PathBuf> {
    if !video_path.exists() {
        return Err(MediaError::FileNotFound(video_path.to_path_buf()));
    }

    if which::which("ffmpeg").is_err() {
        return Err(MediaError::ToolNotFound {
            tool: "ffmpeg".to_string(),
        });
    }

    let stem = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let audio_path = output_dir.join(format!("{}.wav", stem));

    info!("Extracting audio from {:?} to {:?}", video_path, audio_path);

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(video_path)
        .args([
            "-vn",
            "-acodec", "pcm_s16le",
            "-ar", "16000",
            "-ac", "1",
            "-y",
        ])
        .arg(&audio_path)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::Ffmpeg(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    debug!("Audio extracted successfully");
    Ok(audio_path)
}
