/// External completion service errors.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion service disabled: {reason}")]
    Disabled { reason: String },

    #[error("completion transport failed: {reason}")]
    Transport { reason: String },

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {reason}")]
    MalformedResponse { reason: String },
}
