//! Web video audio download via yt-dlp.

use crate::error::{MediaError, MediaResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Metadata about a web video, fetched without downloading content.
#[derive(Debug, Clone, Default)]
pub struct YoutubeMetadata {
    pub title: String,
    /// Duration in seconds.
    pub duration: f64,
}

/// Fetch title and duration for a video URL.
pub fn video_metadata(url: &str) -> MediaResult<YoutubeMetadata> {
    if which::which("yt-dlp").is_err() {
        return Err(MediaError::ToolNotFound {
            tool: "yt-dlp".to_string(),
        });
    }

    let output = Command::new("yt-dlp")
        .args(["--no-download", "--print", "%(title)s\n%(duration)s"])
        .arg(url)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::Download(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    let title = lines.next().unwrap_or("").trim().to_string();
    let duration = lines
        .next()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(YoutubeMetadata { title, duration })
}

/// Download the audio track of a video URL into `output_dir`.
///
/// Streams bestaudio directly, so no local video decoder is needed.
/// Returns the path of the downloaded file.
pub fn download_audio(url: &str, output_dir: &Path) -> MediaResult<PathBuf> {
    if which::which("yt-dlp").is_err() {
        return Err(MediaError::ToolNotFound {
            tool: "yt-dlp".to_string(),
        });
    }

    info!("Downloading audio for {}", url);

    let template = output_dir.join("audio.%(ext)s");
    let output = Command::new("yt-dlp")
        .args(["-f", "bestaudio/best"])
        .args(["--no-playlist", "--quiet", "--no-warnings"])
        .arg("-o")
        .arg(&template)
        .arg(url)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::Download(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    // yt-dlp picks the extension, so locate whatever landed in the dir
    let downloaded = std::fs::read_dir(output_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s == "audio")
                .unwrap_or(false)
        })
        .ok_or_else(|| MediaError::Download("yt-dlp produced no output file".to_string()))?;

    debug!("Downloaded audio to {:?}", downloaded);
    Ok(downloaded)
}
