//! Router: one request in, one `ResultEnvelope` out.
//!
//! Greetings skip classification and go straight to a conversational reply.
//! Everything else is classified, stripped of any route prefix, and sent to
//! the matching service. Errors become the envelope's error payload.

use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use regex::Regex;
use serde_json::{json, Value};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use switchyard_core::constants::{
    strip_prefix_ignore_case, CHITCHAT_FALLBACK_REPLY, HYBRID_PREFIX, SIMILAR_PREFIX, SQL_PREFIX,
    VECTOR_PREFIX,
};
use switchyard_core::errors::{SwitchyardError, SwitchyardResult};
use switchyard_core::models::DegradationEvent;
use switchyard_core::traits::{CancellationToken, CompletionRequest, ICompletionService};
use switchyard_core::{AllowlistRegistry, ResultEnvelope, RouteDecision, SwitchyardConfig};
use switchyard_planning::{PlanExecutor, PlanValidator, Planner, QueryClassifier};

use crate::services::{HybridQueryService, SqlQueryService, VectorQueryService};
use crate::Collaborators;

static GREETING_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(hi|hello|hey|sup|good (morning|evening)|how (are|r) (you|u))\b").ok()
});

const CHAT_SYSTEM_PROMPT: &str = "You are a helpful, concise assistant for a product catalog.";

const ROUTE_PREFIXES: &[&str] = &[SQL_PREFIX, VECTOR_PREFIX, SIMILAR_PREFIX, HYBRID_PREFIX];

pub fn is_greeting(text: &str) -> bool {
    GREETING_RE
        .as_ref()
        .is_some_and(|re| re.is_match(text.trim()))
}

/// Remove a leading route prefix, if any.
pub fn strip_route_prefix(text: &str) -> &str {
    let trimmed = text.trim();
    ROUTE_PREFIXES
        .iter()
        .find_map(|p| strip_prefix_ignore_case(trimmed, p))
        .unwrap_or(trimmed)
}

pub struct Router {
    completion: Arc<dyn ICompletionService>,
    classifier: QueryClassifier,
    sql: SqlQueryService,
    vector: VectorQueryService,
    hybrid: HybridQueryService,
    chat_temperature: f32,
    chat_timeout: Duration,
}

impl Router {
    /// Wire every component from `config`. Fails only on an inconsistent
    /// allowlist.
    pub fn new(collab: Collaborators, config: &SwitchyardConfig) -> SwitchyardResult<Self> {
        let registry = Arc::new(AllowlistRegistry::from_config(&config.allowlist)?);
        let validator = Arc::new(PlanValidator::new(registry.clone()));

        let classifier = QueryClassifier::new(collab.completion.clone(), config.classifier.clone());
        let planner = Planner::new(
            collab.completion.clone(),
            registry.clone(),
            config.planner.clone(),
        );
        let executor = PlanExecutor::new(
            collab.relational.clone(),
            collab.vectors.clone(),
            collab.embedder.clone(),
            registry.clone(),
        );

        Ok(Self {
            completion: collab.completion,
            classifier,
            sql: SqlQueryService::new(collab.relational.clone(), validator.clone()),
            vector: VectorQueryService::new(
                collab.embedder,
                collab.vectors,
                collab.relational,
                registry,
                config.planner.vector_topk,
            ),
            hybrid: HybridQueryService::new(planner, validator, executor),
            chat_temperature: config.completion.chat_temperature,
            chat_timeout: Duration::from_millis(config.completion.timeout_ms),
        })
    }

    pub fn hybrid(&self) -> &HybridQueryService {
        &self.hybrid
    }

    /// Handle one request. Never fails: every error lands in the envelope.
    pub async fn handle(&self, text: &str, cancel: &CancellationToken) -> ResultEnvelope {
        self.handle_with_id(text, Uuid::new_v4(), cancel).await
    }

    /// [`handle`](Self::handle) under a caller-chosen request id, shared by
    /// the route span and `meta.request_id`.
    pub async fn handle_with_id(
        &self,
        text: &str,
        request_id: Uuid,
        cancel: &CancellationToken,
    ) -> ResultEnvelope {
        let started = Instant::now();
        let mut degradations = Vec::new();

        let envelope = self
            .route(text, cancel, &mut degradations)
            .instrument(switchyard_planning::route_span!(request_id))
            .await;

        envelope
            .with_request_id(request_id)
            .with_elapsed_ms(started.elapsed().as_millis() as u64)
            .with_degradations(degradations)
    }

    async fn route(
        &self,
        text: &str,
        cancel: &CancellationToken,
        degradations: &mut Vec<DegradationEvent>,
    ) -> ResultEnvelope {
        if is_greeting(text) {
            info!(route = "chitchat", "greeting fast path");
            return self.chitchat(text, cancel, degradations).await;
        }

        let classification = match self.classifier.classify_detailed(text, cancel).await {
            Ok(c) => c,
            Err(e) => return ResultEnvelope::failure(RouteDecision::ChitChat, None, &e),
        };
        degradations.extend(classification.degradation);
        let route = classification.route;
        info!(route = %route, basis = ?classification.basis, "dispatching");

        let query = strip_route_prefix(text).to_string();
        let outcome = match route {
            RouteDecision::ChitChat => return self.chitchat(text, cancel, degradations).await,
            RouteDecision::Sql => self.sql.dispatch(&query, cancel).await,
            RouteDecision::Vector => self.vector.dispatch(&query, cancel).await,
            RouteDecision::Hybrid => self.hybrid.dispatch(&query, cancel).await.map(|out| {
                degradations.extend(out.degradations);
                out.data
            }),
        };

        match outcome {
            Ok(data) => ResultEnvelope::success(route, Some(query), data),
            Err(e) => {
                warn!(route = %route, error = %e, "dispatch failed");
                ResultEnvelope::failure(route, Some(query), &e)
            }
        }
    }

    async fn chitchat(
        &self,
        text: &str,
        cancel: &CancellationToken,
        degradations: &mut Vec<DegradationEvent>,
    ) -> ResultEnvelope {
        match self.chat(text, cancel).await {
            Ok(reply) => ResultEnvelope::success(RouteDecision::ChitChat, None, reply_data(&reply)),
            Err(SwitchyardError::Cancelled) => {
                ResultEnvelope::failure(RouteDecision::ChitChat, None, &SwitchyardError::Cancelled)
            }
            Err(e) => {
                warn!(error = %e, "chat reply failed, using fallback reply");
                degradations.push(DegradationEvent::now(
                    "chitchat",
                    e.to_string(),
                    "fallback_reply",
                ));
                ResultEnvelope::success(
                    RouteDecision::ChitChat,
                    None,
                    reply_data(CHITCHAT_FALLBACK_REPLY),
                )
            }
        }
    }

    async fn chat(&self, text: &str, cancel: &CancellationToken) -> SwitchyardResult<String> {
        cancel.check()?;
        let request = CompletionRequest::chat(CHAT_SYSTEM_PROMPT, text.trim(), self.chat_temperature);
        let call = cancel.run_until_cancelled(self.completion.complete(&request));
        match tokio::time::timeout(self.chat_timeout, call).await {
            Err(_) => Err(SwitchyardError::Timeout {
                operation: "chat".to_string(),
                timeout_ms: self.chat_timeout.as_millis() as u64,
            }),
            Ok(result) => result?,
        }
    }
}

fn reply_data(reply: &str) -> Value {
    json!({ "reply": reply })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_are_detected() {
        assert!(is_greeting("Hello there"));
        assert!(is_greeting("good morning!"));
        assert!(is_greeting("how r u"));
        assert!(!is_greeting("high visibility vest"));
        assert!(!is_greeting("show me hi-vis vests"));
    }

    #[test]
    fn route_prefixes_are_stripped() {
        assert_eq!(strip_route_prefix("SQL: all products"), "all products");
        assert_eq!(strip_route_prefix("similar:red mug"), "red mug");
        assert_eq!(strip_route_prefix("cheapest mug"), "cheapest mug");
    }
}
