//! Hybrid service: plan, validate, execute.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use switchyard_core::errors::{PlanError, SwitchyardResult};
use switchyard_core::models::DegradationEvent;
use switchyard_core::traits::CancellationToken;
use switchyard_core::Plan;
use switchyard_planning::{PlanExecutor, PlanValidator, Planner, PlannerOutput};

/// Result of a hybrid request plus any fallback taken while planning.
#[derive(Debug, Clone)]
pub struct HybridOutcome {
    pub data: Value,
    pub degradations: Vec<DegradationEvent>,
}

pub struct HybridQueryService {
    planner: Planner,
    validator: Arc<PlanValidator>,
    executor: PlanExecutor,
}

impl HybridQueryService {
    pub fn new(planner: Planner, validator: Arc<PlanValidator>, executor: PlanExecutor) -> Self {
        Self {
            planner,
            validator,
            executor,
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn validator(&self) -> &PlanValidator {
        &self.validator
    }

    /// Plan `text`, gate the plan, and return the executed result.
    pub async fn dispatch(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<HybridOutcome> {
        let output = self.planner.plan_detailed(text, cancel).await?;
        let degradations = output.degradation().into_iter().collect();
        let data = self.run(&output.plan, cancel).await?;
        info!(source = output.source.label(), "hybrid dispatch");
        Ok(HybridOutcome { data, degradations })
    }

    /// Plan only, without the allowlist gate or execution.
    pub async fn plan(&self, text: &str, cancel: &CancellationToken) -> SwitchyardResult<PlannerOutput> {
        self.planner.plan_detailed(text, cancel).await
    }

    /// Run a submitted document: `{"plan": [...]}` is decoded and executed
    /// as given, `{"input": "..."}` is planned first. Returns `{plan, result}`
    /// where `plan` is the validated plan that actually ran.
    pub async fn execute_document(
        &self,
        doc: &Value,
        cancel: &CancellationToken,
    ) -> SwitchyardResult<Value> {
        let plan = if doc.get("plan").is_some() {
            self.validator.validate_document(doc)?
        } else if let Some(input) = doc.get("input").and_then(Value::as_str) {
            let output = self.planner.plan_detailed(input, cancel).await?;
            self.validator.validate(&output.plan)?
        } else {
            return Err(PlanError::NotAPlanDocument.into());
        };

        let binding = self.executor.execute(&plan, cancel).await?;
        Ok(json!({ "plan": plan, "result": binding }))
    }

    async fn run(&self, plan: &Plan, cancel: &CancellationToken) -> SwitchyardResult<Value> {
        let validated = self.validator.validate(plan)?;
        let binding = self.executor.execute(&validated, cancel).await?;
        Ok(serde_json::to_value(binding)?)
    }
}
