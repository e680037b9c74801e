//! Image extractor: OCR via tesseract, degrading cleanly when absent.

use crate::error::{ExtractError, ExtractResult};
use crate::extractor::{require_nonempty, Extraction, Extractor, SourceInput};
use trove_config::Capabilities;
use tracing::{debug, warn};

/// Extractor for still images. Runs OCR when tesseract is installed and
/// OCR is enabled; otherwise records the image in degraded mode so it is
/// still listed and re-processable later.
pub struct ImageExtractor {
    ocr_enabled: bool,
    tesseract_available: bool,
}

impl ImageExtractor {
    pub fn new(caps: &Capabilities, ocr_enabled: bool) -> Self {
        Self {
            ocr_enabled,
            tesseract_available: caps.tesseract,
        }
    }
}

impl Extractor for ImageExtractor {
    fn extract(&self, input: &SourceInput) -> ExtractResult<Extraction> {
        let origin = input.origin();
        let path = input
            .path()
            .ok_or_else(|| ExtractError::failed(&origin, "image extractor needs a file"))?;

        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }
        let size = require_nonempty(path, &origin)?;

        if !self.ocr_enabled || !self.tesseract_available {
            let reason = if !self.ocr_enabled {
                "ocr disabled in config"
            } else {
                "tesseract not installed"
            };
            warn!(origin = %origin, reason, "Skipping OCR, recording image in degraded mode");
            return Ok(Extraction::degraded(serde_json::json!({
                "format": "image",
                "size_bytes": size,
                "ocr_skipped": true,
                "skip_reason": reason,
            })));
        }

        let ocr = trove_media::ocr_image(path)
            .map_err(|e| ExtractError::failed(&origin, format!("OCR failed: {}", e)))?;

        debug!(origin = %origin, chars = ocr.text.len(), "OCR complete");

        Ok(Extraction::new(
            ocr.text,
            serde_json::json!({
                "format": "image",
                "size_bytes": size,
                "ocr_skipped": false,
            }),
        ))
    }
}
