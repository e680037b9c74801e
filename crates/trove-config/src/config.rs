//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub synthesizer: SynthesizerConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        let default_config = Self::default_config_string();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config)?;
        Ok(())
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }
        if self.retrieval.excerpt_chars == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.excerpt_chars must be at least 1".to_string(),
            ));
        }
        if self.synthesizer.retry_attempts == 0 {
            return Err(ConfigError::Invalid(
                "synthesizer.retry_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Trove Configuration
# Multimodal knowledge base: ingest files, ask questions.

[general]
# Data directory for the database
# data_dir = "~/.local/share/trove"

[synthesizer]
# Ollama server address
host = "http://localhost:11434"

# Model used to synthesize answers
model = "gpt-oss:20b"

# Request timeout in seconds
timeout_seconds = 120

# Transient-failure retries around the synthesizer call
retry_attempts = 3
retry_backoff_ms = 500

[retrieval]
# How many records go into the context bundle
top_k = 5

# Excerpt length cap per record, in characters
excerpt_chars = 1200

# Minimum lexical score for a record to be considered relevant
relevance_floor = 1.0

[processing]
# OCR for images (requires tesseract on PATH)
ocr_enabled = true

# Speech transcription for audio/video (requires whisper on PATH)
transcribe = true

# Whisper model size: tiny, base, small, medium, large
whisper_model = "base"
"#
        .to_string()
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

/// Answer synthesizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    pub host: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "gpt-oss:20b".to_string(),
            timeout_seconds: 120,
            retry_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub excerpt_chars: usize,
    pub relevance_floor: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            excerpt_chars: 1200,
            relevance_floor: 1.0,
        }
    }
}

/// Content processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub ocr_enabled: bool,
    pub transcribe: bool,
    pub whisper_model: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            transcribe: true,
            whisper_model: "base".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.synthesizer.host, "http://localhost:11434");
        assert_eq!(config.retrieval.top_k, 5);
        assert!(config.processing.ocr_enabled);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.synthesizer.model, deserialized.synthesizer.model);
        assert_eq!(config.retrieval.excerpt_chars, deserialized.retrieval.excerpt_chars);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [retrieval]
            top_k = 3
            "#
        )
        .unwrap();

        let path = temp_file.path().to_path_buf();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.retrieval.top_k, 3);
        // Unspecified sections fall back to defaults
        assert_eq!(config.synthesizer.retry_attempts, 3);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let path = PathBuf::from("/nonexistent/trove-config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [retrieval]
            top_k = 0
            "#
        )
        .unwrap();

        let path = temp_file.path().to_path_buf();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_default_file_parses() {
        let config: Config = toml::from_str(&Config::default_config_string()).unwrap();
        assert_eq!(config.synthesizer.retry_backoff_ms, 500);
    }
}
