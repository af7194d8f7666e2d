//! Planner: completion service first, deterministic heuristic fallback.
//!
//! The model path is a single call returning a plan or a `FallbackReason`;
//! any reason except cancellation lands on [`heuristic_plan`].

mod heuristic;
mod prompt;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn, Instrument};

use switchyard_core::config::PlannerConfig;
use switchyard_core::errors::{SwitchyardError, SwitchyardResult};
use switchyard_core::models::DegradationEvent;
use switchyard_core::plan::{wire, Plan};
use switchyard_core::traits::{CancellationToken, CompletionRequest, ICompletionService};
use switchyard_core::AllowlistRegistry;

pub use heuristic::{extract_search_text, extract_top_n, heuristic_plan};
pub use prompt::{planner_user_prompt, PLANNER_SYSTEM_PROMPT};

/// Why the model plan was not used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Model planning turned off in config.
    Disabled,
    /// No credentials, transport failure, or non-2xx status.
    Unavailable(String),
    Timeout(u64),
    /// Reply was not a decodable plan document.
    Malformed(String),
    /// Reply decoded to a plan with no steps.
    EmptyPlan,
    Cancelled,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("model planner disabled"),
            Self::Unavailable(reason) => write!(f, "completion service unavailable: {reason}"),
            Self::Timeout(ms) => write!(f, "planning call timed out after {ms}ms"),
            Self::Malformed(reason) => write!(f, "malformed plan: {reason}"),
            Self::EmptyPlan => f.write_str("model returned an empty plan"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Where a plan came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    Model,
    Heuristic(FallbackReason),
    /// Empty input: no steps.
    EmptyInput,
}

impl PlanSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Heuristic(_) => "heuristic",
            Self::EmptyInput => "empty",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerOutput {
    pub plan: Plan,
    pub source: PlanSource,
}

impl PlannerOutput {
    /// Degradation record when the heuristic stood in for the model.
    pub fn degradation(&self) -> Option<DegradationEvent> {
        match &self.source {
            PlanSource::Heuristic(FallbackReason::Disabled) => None,
            PlanSource::Heuristic(reason) => Some(DegradationEvent::now(
                "planner",
                reason.to_string(),
                "heuristic_plan",
            )),
            _ => None,
        }
    }
}

pub struct Planner {
    completion: Arc<dyn ICompletionService>,
    registry: Arc<AllowlistRegistry>,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(
        completion: Arc<dyn ICompletionService>,
        registry: Arc<AllowlistRegistry>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            completion,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Errs only on cancellation.
    pub async fn plan(&self, text: &str, cancel: &CancellationToken) -> SwitchyardResult<Plan> {
        Ok(self.plan_detailed(text, cancel).await?.plan)
    }

    pub async fn plan_detailed(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<PlannerOutput> {
        let span = crate::plan_span!(text.len());
        async {
            cancel.check()?;
            if text.trim().is_empty() {
                return Ok(PlannerOutput {
                    plan: Plan::empty(),
                    source: PlanSource::EmptyInput,
                });
            }

            match self.plan_with_model(text, cancel).await {
                Ok(plan) => {
                    info!(steps = plan.len(), "model plan accepted");
                    Ok(PlannerOutput {
                        plan,
                        source: PlanSource::Model,
                    })
                }
                Err(FallbackReason::Cancelled) => Err(SwitchyardError::Cancelled),
                Err(reason) => {
                    if reason != FallbackReason::Disabled {
                        warn!(reason = %reason, "falling back to heuristic planner");
                    }
                    Ok(PlannerOutput {
                        plan: heuristic_plan(text, &self.config),
                        source: PlanSource::Heuristic(reason),
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// One structured-JSON call to the completion service.
    pub async fn plan_with_model(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Plan, FallbackReason> {
        if !self.config.use_model {
            return Err(FallbackReason::Disabled);
        }
        if !self.completion.is_available() {
            return Err(FallbackReason::Unavailable(format!(
                "{} is not configured",
                self.completion.name()
            )));
        }

        let request = CompletionRequest::json(
            PLANNER_SYSTEM_PROMPT,
            &planner_user_prompt(&self.registry, text),
            self.config.temperature,
        );
        let call = cancel.run_until_cancelled(self.completion.complete(&request));
        let reply = match tokio::time::timeout(Duration::from_millis(self.config.timeout_ms), call)
            .await
        {
            Err(_) => return Err(FallbackReason::Timeout(self.config.timeout_ms)),
            Ok(Err(SwitchyardError::Cancelled)) => return Err(FallbackReason::Cancelled),
            Ok(Err(e)) | Ok(Ok(Err(e))) => return Err(FallbackReason::Unavailable(e.to_string())),
            Ok(Ok(Ok(reply))) => reply,
        };

        let plan = parse_model_plan(&reply)?;
        debug!(steps = plan.len(), "decoded model plan");
        Ok(plan)
    }
}

/// Decode the model's reply; no steps counts as a failure.
fn parse_model_plan(reply: &str) -> Result<Plan, FallbackReason> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(FallbackReason::Malformed("empty reply".to_string()));
    }
    let doc: Value =
        serde_json::from_str(trimmed).map_err(|e| FallbackReason::Malformed(e.to_string()))?;
    let plan = wire::decode_document(&doc).map_err(|e| FallbackReason::Malformed(e.to_string()))?;
    if plan.is_empty() {
        return Err(FallbackReason::EmptyPlan);
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_reply_parsing() {
        let plan = parse_model_plan(
            r#"{"plan":[{"op":"vector_search","entity":"product","text":"mug","topk":5,"return":"ids"}]}"#,
        )
        .unwrap();
        assert_eq!(plan.len(), 1);

        assert_eq!(parse_model_plan(r#"{"plan":[]}"#), Err(FallbackReason::EmptyPlan));
        assert!(matches!(parse_model_plan("sure! here you go"), Err(FallbackReason::Malformed(_))));
        assert!(matches!(
            parse_model_plan(r#"{"plan":[{"op":"drop_table"}]}"#),
            Err(FallbackReason::Malformed(_))
        ));
        assert!(matches!(parse_model_plan("  "), Err(FallbackReason::Malformed(_))));
    }
}
