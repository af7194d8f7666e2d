use serde::{Deserialize, Serialize};

use super::defaults;

/// Planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Try the completion service before the heuristic planner.
    pub use_model: bool,
    /// Upper bound on the planning call (milliseconds).
    pub timeout_ms: u64,
    pub temperature: f32,
    /// `topk` of the vector_search step in heuristic plans.
    pub heuristic_topk: usize,
    /// Result count for supplier plans when the text names none.
    pub supplier_result_limit: usize,
    /// Result count for price plans when the text names none.
    pub price_result_limit: usize,
    /// Default `topk` for the vector-only service.
    pub vector_topk: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            use_model: defaults::DEFAULT_USE_MODEL_PLANNER,
            timeout_ms: defaults::DEFAULT_PLAN_TIMEOUT_MS,
            temperature: defaults::DEFAULT_PLANNER_TEMPERATURE,
            heuristic_topk: defaults::DEFAULT_HEURISTIC_TOPK,
            supplier_result_limit: defaults::DEFAULT_SUPPLIER_RESULT_LIMIT,
            price_result_limit: defaults::DEFAULT_PRICE_RESULT_LIMIT,
            vector_topk: defaults::DEFAULT_VECTOR_TOPK,
        }
    }
}
