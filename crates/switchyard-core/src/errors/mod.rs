mod completion_error;
mod embedding_error;
mod plan_error;
mod storage_error;
mod switchyard_error;
mod validation_error;

pub use completion_error::CompletionError;
pub use embedding_error::EmbeddingError;
pub use plan_error::PlanError;
pub use storage_error::StorageError;
pub use switchyard_error::SwitchyardError;
pub use validation_error::{ValidationError, Violation};

/// Result alias used throughout the workspace.
pub type SwitchyardResult<T> = Result<T, SwitchyardError>;
