use serde::{Deserialize, Serialize};

use super::defaults;

/// External embedding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama-style base URL (the client appends `/api/embeddings`).
    pub base_url: String,
    /// Embedding model name.
    pub model: String,
    /// Expected vector width. Zero disables the check.
    pub dimensions: usize,
    /// Transport timeout for a single request (milliseconds).
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_EMBEDDING_BASE_URL.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            timeout_ms: defaults::DEFAULT_EMBEDDING_TIMEOUT_MS,
        }
    }
}
