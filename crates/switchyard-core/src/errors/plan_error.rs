/// Plan wire-format decode errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    #[error("plan document is not an object with a 'plan' array")]
    NotAPlanDocument,

    #[error("step {index} is not a JSON object")]
    StepNotObject { index: usize },

    #[error("step {index} has no 'op' tag")]
    MissingOp { index: usize },

    #[error("step {index} has unknown op '{op}'")]
    UnknownOp { index: usize, op: String },

    #[error("step {index}: field '{field}' {reason}")]
    InvalidField {
        index: usize,
        field: String,
        reason: String,
    },
}
