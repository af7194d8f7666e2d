//! # switchyard-planning
//!
//! The decision-and-execution pipeline: classify a request, plan it (model
//! first, deterministic heuristic fallback), gate the plan through the
//! allowlist, then interpret it against the relational and vector stores.

pub mod classifier;
pub mod executor;
pub mod planner;
pub mod spans;
pub mod validator;

pub use classifier::{Classification, ClassificationBasis, QueryClassifier};
pub use executor::{Binding, PlanExecutor, VariableTable};
pub use planner::{heuristic_plan, FallbackReason, PlanSource, Planner, PlannerOutput};
pub use validator::PlanValidator;
