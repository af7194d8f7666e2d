//! Ollama-style embedding provider.
//!
//! POST `{base_url}/api/embeddings` with `{model, prompt}`. Accepts either
//! `{"embedding": [...]}` or `{"data": [{"embedding": [...]}]}`; any other
//! shape is a hard error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use switchyard_core::config::EmbeddingConfig;
use switchyard_core::errors::{EmbeddingError, SwitchyardError, SwitchyardResult};
use switchyard_core::traits::IEmbeddingProvider;

use crate::endpoint;

pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    dimensions: usize,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct EmbedBody<'a> {
    model: &'a str,
    prompt: &'a str,
}

impl OllamaEmbeddingProvider {
    pub fn from_config(config: &EmbeddingConfig) -> SwitchyardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SwitchyardError::ConfigError(format!("embedding client: {e}")))?;
        Ok(Self {
            client,
            url: endpoint(&config.base_url, "api/embeddings"),
            model: config.model.clone(),
            dimensions: config.dimensions,
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Extract the vector and check its width when `expected_dims` is non-zero.
fn parse_embedding_response(body: &str, expected_dims: usize) -> Result<Vec<f32>, EmbeddingError> {
    let unexpected = || EmbeddingError::UnexpectedShape {
        body: body.chars().take(200).collect(),
    };

    let parsed: Value = serde_json::from_str(body).map_err(|_| unexpected())?;
    let array = parsed
        .get("embedding")
        .or_else(|| parsed.pointer("/data/0/embedding"))
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
        .ok_or_else(unexpected)?;

    let vector = array
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<f32>>>()
        .ok_or_else(unexpected)?;

    if expected_dims > 0 && vector.len() != expected_dims {
        return Err(EmbeddingError::DimensionMismatch {
            expected: expected_dims,
            actual: vector.len(),
        });
    }
    Ok(vector)
}

#[async_trait]
impl IEmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> SwitchyardResult<Vec<f32>> {
        let body = EmbedBody {
            model: &self.model,
            prompt: text,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SwitchyardError::Timeout {
                        operation: "embedding".to_string(),
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    EmbeddingError::Transport {
                        reason: e.to_string(),
                    }
                    .into()
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| EmbeddingError::Transport {
            reason: e.to_string(),
        })?;
        if !status.is_success() {
            warn!(status = %status, model = %self.model, "embedding service returned an error");
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let vector = parse_embedding_response(&text, self.dimensions)?;
        debug!(model = %self.model, dims = vector.len(), "embedding ok");
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}
