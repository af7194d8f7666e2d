//! QueryClassifier: local heuristics first, then one closed-label model call.
//!
//! Every model failure (disabled, timeout, transport, unknown label) lands on
//! `ChitChat`. Only cancellation is reported as an error.

mod heuristics;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn, Instrument};

use switchyard_core::config::ClassifierConfig;
use switchyard_core::errors::{SwitchyardError, SwitchyardResult};
use switchyard_core::models::DegradationEvent;
use switchyard_core::traits::{CancellationToken, CompletionRequest, ICompletionService};
use switchyard_core::RouteDecision;

pub use heuristics::heuristic_route;

const CLASSIFIER_SYSTEM_PROMPT: &str = "You are a strict router for a product catalog assistant. \
Return ONLY one token: structured, semantic, hybrid, or chitchat. \
structured = exact listings, filters, counts or totals. \
semantic = find items similar to a description. \
hybrid = similarity search combined with price or supplier constraints. \
chitchat = anything conversational.";

/// Which stage produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationBasis {
    Empty,
    Prefix,
    Shortcut,
    Keyword,
    Model,
    /// The model was not consulted: disabled by config or no credentials.
    ModelDisabled,
    /// The model call failed or timed out.
    ModelFailed,
}

#[derive(Debug, Clone)]
pub struct Classification {
    pub route: RouteDecision,
    pub basis: ClassificationBasis,
    pub degradation: Option<DegradationEvent>,
}

impl Classification {
    fn settled(route: RouteDecision, basis: ClassificationBasis) -> Self {
        Self {
            route,
            basis,
            degradation: None,
        }
    }

    fn degraded(basis: ClassificationBasis, failure: String) -> Self {
        Self {
            route: RouteDecision::ChitChat,
            basis,
            degradation: Some(DegradationEvent::now("classifier", failure, "chitchat")),
        }
    }
}

pub struct QueryClassifier {
    completion: Arc<dyn ICompletionService>,
    config: ClassifierConfig,
}

impl QueryClassifier {
    pub fn new(completion: Arc<dyn ICompletionService>, config: ClassifierConfig) -> Self {
        Self { completion, config }
    }

    pub async fn classify(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<RouteDecision> {
        Ok(self.classify_detailed(text, cancel).await?.route)
    }

    pub async fn classify_detailed(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<Classification> {
        let span = crate::classify_span!(text.len());
        async {
            cancel.check()?;

            if let Some((route, basis)) = heuristic_route(text) {
                debug!(route = %route, basis = ?basis, "heuristic classification");
                return Ok(Classification::settled(route, basis));
            }

            if !self.config.use_model || !self.completion.is_available() {
                debug!("model classifier disabled, defaulting to chitchat");
                return Ok(Classification::degraded(
                    ClassificationBasis::ModelDisabled,
                    "model classifier unavailable".to_string(),
                ));
            }

            let request = CompletionRequest::chat(
                CLASSIFIER_SYSTEM_PROMPT,
                &format!("Prompt:\n{text}"),
                self.config.temperature,
            );
            let timeout = Duration::from_millis(self.config.timeout_ms);
            let call = cancel.run_until_cancelled(self.completion.complete(&request));

            match tokio::time::timeout(timeout, call).await {
                Err(_) => {
                    warn!(timeout_ms = self.config.timeout_ms, "classifier call timed out");
                    Ok(Classification::degraded(
                        ClassificationBasis::ModelFailed,
                        format!("timed out after {}ms", self.config.timeout_ms),
                    ))
                }
                Ok(Err(SwitchyardError::Cancelled)) => Err(SwitchyardError::Cancelled),
                Ok(Err(e)) | Ok(Ok(Err(e))) => {
                    warn!(error = %e, "classifier call failed");
                    Ok(Classification::degraded(
                        ClassificationBasis::ModelFailed,
                        e.to_string(),
                    ))
                }
                Ok(Ok(Ok(reply))) => {
                    let route = parse_route_reply(&reply);
                    debug!(route = %route, reply = %reply.trim(), "model classification");
                    Ok(Classification::settled(route, ClassificationBasis::Model))
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// A bare label, or a JSON object carrying a `route` label.
fn parse_route_reply(reply: &str) -> RouteDecision {
    let trimmed = reply.trim();
    if trimmed.starts_with('{') {
        if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(trimmed) {
            if let Some(label) = obj.get("route").and_then(Value::as_str) {
                return RouteDecision::from_label(label);
            }
        }
        return RouteDecision::ChitChat;
    }
    let first = trimmed.split_whitespace().next().unwrap_or_default();
    RouteDecision::from_label(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_parsing_accepts_token_and_json() {
        assert_eq!(parse_route_reply("Semantic"), RouteDecision::Vector);
        assert_eq!(parse_route_reply("  hybrid.\n"), RouteDecision::Hybrid);
        assert_eq!(parse_route_reply(r#"{"route":"sql","query":"all products"}"#), RouteDecision::Sql);
        assert_eq!(parse_route_reply(r#"{"label":"sql"}"#), RouteDecision::ChitChat);
        assert_eq!(parse_route_reply("I think structured"), RouteDecision::ChitChat);
    }
}
