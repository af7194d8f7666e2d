use serde::{Deserialize, Serialize};

use super::defaults;

/// External completion service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// OpenAI-compatible base URL (the client appends `/chat/completions`).
    pub base_url: String,
    /// Bearer token. When absent the service is treated as disabled.
    pub api_key: Option<String>,
    /// Model name sent with every request.
    pub model: String,
    /// Transport timeout for a single request (milliseconds).
    pub timeout_ms: u64,
    /// Sampling temperature for conversational replies.
    pub chat_temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_COMPLETION_BASE_URL.to_string(),
            api_key: None,
            model: defaults::DEFAULT_COMPLETION_MODEL.to_string(),
            timeout_ms: defaults::DEFAULT_COMPLETION_TIMEOUT_MS,
            chat_temperature: defaults::DEFAULT_CHAT_TEMPERATURE,
        }
    }
}
