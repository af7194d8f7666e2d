//! Span definitions per pipeline stage: classify, plan, execute, route.

/// Create a classification span.
#[macro_export]
macro_rules! classify_span {
    ($chars:expr) => {
        tracing::info_span!("switchyard.classify", chars = $chars)
    };
}

/// Create a planning span.
#[macro_export]
macro_rules! plan_span {
    ($chars:expr) => {
        tracing::info_span!("switchyard.plan", chars = $chars)
    };
}

/// Create an execution span.
#[macro_export]
macro_rules! execute_span {
    ($steps:expr) => {
        tracing::info_span!("switchyard.execute", steps = $steps)
    };
}

/// Create a routing span.
#[macro_export]
macro_rules! route_span {
    ($request_id:expr) => {
        tracing::info_span!("switchyard.route", request_id = %$request_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const CLASSIFY: &str = "switchyard.classify";
    pub const PLAN: &str = "switchyard.plan";
    pub const EXECUTE: &str = "switchyard.execute";
    pub const ROUTE: &str = "switchyard.route";
}
