use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::DegradationEvent;
use crate::errors::SwitchyardError;
use crate::route::RouteDecision;

/// Error half of an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

impl From<&SwitchyardError> for ErrorPayload {
    fn from(e: &SwitchyardError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: Uuid,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degradations: Vec<DegradationEvent>,
}

/// Uniform response shape. Exactly one of `data` and `error` is set;
/// the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    route: RouteDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    data: Option<Value>,
    error: Option<ErrorPayload>,
    meta: EnvelopeMeta,
}

impl ResultEnvelope {
    pub fn success(route: RouteDecision, query: Option<String>, data: Value) -> Self {
        Self {
            route,
            query,
            data: Some(data),
            error: None,
            meta: EnvelopeMeta::fresh(),
        }
    }

    pub fn failure(route: RouteDecision, query: Option<String>, error: &SwitchyardError) -> Self {
        Self {
            route,
            query,
            data: None,
            error: Some(ErrorPayload::from(error)),
            meta: EnvelopeMeta::fresh(),
        }
    }

    /// Adopt the caller's request id so responses match its log spans.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.meta.request_id = request_id;
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.meta.elapsed_ms = elapsed_ms;
        self
    }

    pub fn with_degradations(mut self, degradations: Vec<DegradationEvent>) -> Self {
        self.meta.degradations = degradations;
        self
    }

    pub fn route(&self) -> RouteDecision {
        self.route
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        self.error.as_ref()
    }

    pub fn meta(&self) -> &EnvelopeMeta {
        &self.meta
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl EnvelopeMeta {
    fn fresh() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            elapsed_ms: 0,
            degradations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_id_is_replaced() {
        let id = Uuid::new_v4();
        let env =
            ResultEnvelope::success(RouteDecision::Sql, None, json!([])).with_request_id(id);
        assert_eq!(env.meta().request_id, id);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["meta"]["request_id"], json!(id.to_string()));
    }

    #[test]
    fn success_has_data_and_null_error() {
        let env = ResultEnvelope::success(RouteDecision::Sql, Some("all products".into()), json!([]));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["route"], "sql");
        assert_eq!(v["data"], json!([]));
        assert!(v["error"].is_null());
    }

    #[test]
    fn failure_has_error_and_null_data() {
        let err = SwitchyardError::Cancelled;
        let env = ResultEnvelope::failure(RouteDecision::Hybrid, None, &err).with_elapsed_ms(7);
        let v = serde_json::to_value(&env).unwrap();
        assert!(v["data"].is_null());
        assert_eq!(v["error"]["kind"], "cancelled");
        assert_eq!(v["meta"]["elapsed_ms"], 7);
        assert!(v.get("query").is_none());
    }
}
