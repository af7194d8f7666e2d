pub mod cancellation;
pub mod completion;
pub mod embedding;
pub mod storage;

pub use cancellation::{Cancellable, CancellationToken};
pub use completion::{CompletionRequest, ICompletionService};
pub use embedding::IEmbeddingProvider;
pub use storage::{IRelationalStore, IVectorStore};
