//! OCR processing using Tesseract.

use crate::error::{MediaError, MediaResult};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Result of OCR processing.
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// The extracted text; empty when the image carries no readable text.
    pub text: String,
}

/// Perform OCR on an image file.
pub fn ocr_image(image_path: &Path) -> MediaResult<OcrResult> {
    if !image_path.exists() {
        return Err(MediaError::FileNotFound(image_path.to_path_buf()));
    }

    if which::which("tesseract").is_err() {
        return Err(MediaError::ToolNotFound {
            tool: "tesseract".to_string(),
        });
    }

    debug!("Running OCR on {:?}", image_path);

    let output = Command::new("tesseract")
        .arg(image_path)
        .arg("stdout")
        .args(["--oem", "3"])
        .args(["--psm", "1"])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        // Tesseract sometimes warns on stderr but still produces output
        if !output.stdout.is_empty() {
            debug!("Tesseract warning: {}", stderr);
        } else {
            return Err(MediaError::Ocr(stderr.to_string()));
        }
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();

    Ok(OcrResult { text })
}
