use async_trait::async_trait;

use crate::errors::SwitchyardResult;

/// One call to the external text-completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    /// Ask for a JSON object response.
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn chat(system: &str, user: &str, temperature: f32) -> Self {
        Self {
            system: system.to_string(),
            user: user.to_string(),
            temperature,
            json_mode: false,
        }
    }

    pub fn json(system: &str, user: &str, temperature: f32) -> Self {
        Self {
            json_mode: true,
            ..Self::chat(system, user, temperature)
        }
    }
}

/// External text-completion service.
#[async_trait]
pub trait ICompletionService: Send + Sync {
    /// Returns the first choice's message content.
    async fn complete(&self, request: &CompletionRequest) -> SwitchyardResult<String>;

    /// Human-readable service name.
    fn name(&self) -> &str;

    /// Whether the service is configured and may be called.
    fn is_available(&self) -> bool;
}
