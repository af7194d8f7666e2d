use super::{CompletionError, EmbeddingError, PlanError, StorageError, ValidationError};

/// Top-level error for every switchyard operation.
#[derive(Debug, thiserror::Error)]
pub enum SwitchyardError {
    #[error("completion error: {0}")]
    CompletionError(#[from] CompletionError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("{0}")]
    ValidationError(#[from] ValidationError),

    #[error("plan decode error: {0}")]
    PlanError(#[from] PlanError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("request cancelled")]
    Cancelled,
}

impl SwitchyardError {
    /// Stable label used in the error payload of a result envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CompletionError(_) => "completion",
            Self::EmbeddingError(_) => "embedding",
            Self::StorageError(_) => "storage",
            Self::ValidationError(_) => "validation",
            Self::PlanError(_) => "plan",
            Self::SerializationError(_) => "serialization",
            Self::ConfigError(_) => "config",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
        }
    }
}
