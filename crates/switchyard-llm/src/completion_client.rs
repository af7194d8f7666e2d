//! OpenAI-compatible chat completion client (Groq, OpenAI, local gateways).
//!
//! POST `{base_url}/chat/completions` with bearer auth. Without an API key
//! the client reports itself unavailable and every call fails fast.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use switchyard_core::config::CompletionConfig;
use switchyard_core::errors::{CompletionError, SwitchyardError, SwitchyardResult};
use switchyard_core::traits::{CompletionRequest, ICompletionService};

use crate::endpoint;

pub struct OpenAiCompatClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatClient {
    pub fn from_config(config: &CompletionConfig) -> SwitchyardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SwitchyardError::ConfigError(format!("completion client: {e}")))?;
        Ok(Self {
            client,
            url: endpoint(&config.base_url, "chat/completions"),
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn build_body<'a>(model: &'a str, request: &'a CompletionRequest) -> ChatBody<'a> {
    ChatBody {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &request.system,
            },
            ChatMessage {
                role: "user",
                content: &request.user,
            },
        ],
        temperature: request.temperature,
        response_format: request.json_mode.then_some(ResponseFormat {
            kind: "json_object",
        }),
    }
}

/// First choice's message content.
fn parse_chat_response(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::MalformedResponse {
            reason: e.to_string(),
        })?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CompletionError::MalformedResponse {
            reason: "response has no choices[0].message.content".to_string(),
        })
}

#[async_trait]
impl ICompletionService for OpenAiCompatClient {
    async fn complete(&self, request: &CompletionRequest) -> SwitchyardResult<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(CompletionError::Disabled {
                reason: "no API key configured".to_string(),
            }
            .into());
        };

        let body = build_body(&self.model, request);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SwitchyardError::Timeout {
                        operation: "completion".to_string(),
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    CompletionError::Transport {
                        reason: e.to_string(),
                    }
                    .into()
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| CompletionError::Transport {
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(status = %status, model = %self.model, "completion service returned an error");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let content = parse_chat_response(&text)?;
        debug!(model = %self.model, json_mode = request.json_mode, chars = content.len(), "completion ok");
        Ok(content)
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_mode_sets_response_format() {
        let req = CompletionRequest::json("sys", "hello", 0.1);
        let body = serde_json::to_value(build_body("gemma2-9b-it", &req)).unwrap();
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn chat_mode_omits_response_format() {
        let req = CompletionRequest::chat("sys", "hi", 0.2);
        let body = serde_json::to_value(build_body("m", &req)).unwrap();
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn parses_first_choice_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hybrid"}},{"message":{"content":"sql"}}]}"#;
        assert_eq!(parse_chat_response(body).unwrap(), "hybrid");
    }

    #[test]
    fn missing_choices_is_malformed() {
        assert!(matches!(
            parse_chat_response(r#"{"choices":[]}"#),
            Err(CompletionError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_chat_response("<html>"),
            Err(CompletionError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn missing_api_key_fails_fast() {
        let client = OpenAiCompatClient::from_config(&CompletionConfig::default()).unwrap();
        assert!(!client.is_available());
        let err = client
            .complete(&CompletionRequest::chat("s", "u", 0.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SwitchyardError::CompletionError(CompletionError::Disabled { .. })
        ));
    }

    #[test]
    fn url_joins_base_and_path() {
        let config = CompletionConfig {
            base_url: "https://api.groq.com/openai/v1/".to_string(),
            ..CompletionConfig::default()
        };
        let client = OpenAiCompatClient::from_config(&config).unwrap();
        assert_eq!(client.url(), "https://api.groq.com/openai/v1/chat/completions");
    }
}
