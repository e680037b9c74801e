//! Synthesizer HTTP client with transient-failure retries.

use crate::error::{SynthError, SynthResult};
use crate::types::{GenerateRequest, GenerateResponse, ListModelsResponse, ModelInfo};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use trove_config::SynthesizerConfig;

/// Client for the local answer synthesizer (Ollama).
#[derive(Clone)]
pub struct SynthClient {
    client: Client,
    host: String,
    model: String,
    timeout: Duration,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl SynthClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &SynthesizerConfig) -> SynthResult<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SynthError::Http)?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout,
            retry_attempts: config.retry_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if the synthesizer server is reachable.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.host);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List available models.
    pub async fn list_models(&self) -> SynthResult<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.host);
        debug!("Listing models from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(SynthError::ApiError {
                status,
                message: text,
            });
        }

        let list: ListModelsResponse = response.json().await?;
        Ok(list.models)
    }

    /// Check if the configured model is installed.
    pub async fn has_model(&self) -> SynthResult<bool> {
        let models = self.list_models().await?;
        // Match both exact name and name without tag
        Ok(models.iter().any(|m| {
            m.name == self.model || m.name.starts_with(&format!("{}:", self.model))
        }))
    }

    /// Generate text (non-streaming), single attempt.
    pub async fn generate(&self, request: GenerateRequest) -> SynthResult<GenerateResponse> {
        let url = format!("{}/api/generate", self.host);
        debug!("Generating with model {}", request.model);

        let mut request = request;
        request.stream = false;

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            if text.contains("not found") || status.as_u16() == 404 {
                return Err(SynthError::ModelNotFound {
                    model: request.model,
                });
            }

            return Err(SynthError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let generate_response: GenerateResponse = response.json().await?;
        Ok(generate_response)
    }

    /// Generate text, retrying transient failures with exponential backoff.
    ///
    /// Non-transient errors (missing model, 4xx rejection) surface on the
    /// first occurrence. When all attempts fail transiently, the result is
    /// `Unavailable` carrying the last underlying error.
    pub async fn generate_with_retry(
        &self,
        request: GenerateRequest,
    ) -> SynthResult<GenerateResponse> {
        let mut backoff = self.retry_backoff;
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            match self.generate(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() => {
                    warn!(
                        attempt,
                        max_attempts = self.retry_attempts,
                        error = %e,
                        "Synthesis attempt failed"
                    );
                    last_error = Some(e);
                    if attempt < self.retry_attempts {
                        tokio::time::sleep(backoff).await;
                        backoff = backoff.saturating_mul(2);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(SynthError::Unavailable {
            attempts: self.retry_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    fn classify_send_error(&self, e: reqwest::Error) -> SynthError {
        if e.is_connect() {
            SynthError::ServerNotRunning {
                host: self.host.clone(),
            }
        } else if e.is_timeout() {
            SynthError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            SynthError::Http(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = SynthesizerConfig::default();
        let client = SynthClient::from_config(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_host_trailing_slash_is_trimmed() {
        let config = SynthesizerConfig {
            host: "http://localhost:11434/".to_string(),
            ..SynthesizerConfig::default()
        };
        let client = SynthClient::from_config(&config).unwrap();
        assert_eq!(client.host, "http://localhost:11434");
    }

    #[test]
    fn test_transient_classification() {
        assert!(SynthError::Timeout { seconds: 5 }.is_transient());
        assert!(SynthError::ServerNotRunning {
            host: "h".to_string()
        }
        .is_transient());
        assert!(!SynthError::ModelNotFound {
            model: "m".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_server_errors_are_retryable_client_errors_are_not() {
        for status in [500, 502, 503] {
            assert!(
                SynthError::ApiError {
                    status,
                    message: String::new()
                }
                .is_transient(),
                "status {status} should be retried"
            );
        }
        for status in [400, 404, 422] {
            assert!(
                !SynthError::ApiError {
                    status,
                    message: String::new()
                }
                .is_transient(),
                "status {status} should fail fast"
            );
        }
    }

    #[tokio::test]
    async fn test_retry_exhaustion_yields_unavailable() {
        // Nothing listens on this port; every attempt is a connect error
        let config = SynthesizerConfig {
            host: "http://127.0.0.1:1".to_string(),
            retry_attempts: 2,
            retry_backoff_ms: 1,
            ..SynthesizerConfig::default()
        };
        let client = SynthClient::from_config(&config).unwrap();

        let err = client
            .generate_with_retry(GenerateRequest::new("m", "p"))
            .await
            .unwrap_err();
        assert!(matches!(err, SynthError::Unavailable { attempts: 2, .. }));
    }
}
