/// Embedding service errors. None of these have a safe fallback value.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding transport failed: {reason}")]
    Transport { reason: String },

    #[error("embedding service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected embedding response shape: {body}")]
    UnexpectedShape { body: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("provider unavailable: {provider}")]
    ProviderUnavailable { provider: String },
}
