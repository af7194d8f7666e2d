//! # switchyard-router
//!
//! Entry point for one request: greeting fast path, classification, then
//! dispatch to the SQL-only, vector-only or planned hybrid service. Every
//! outcome, failures included, comes back as a `ResultEnvelope`.

pub mod router;
pub mod services;
pub mod tracing_setup;

use std::sync::Arc;

use switchyard_core::traits::{
    ICompletionService, IEmbeddingProvider, IRelationalStore, IVectorStore,
};

pub use router::Router;
pub use services::{HybridQueryService, SqlQueryService, VectorQueryService};

/// External collaborators a [`Router`] is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub completion: Arc<dyn ICompletionService>,
    pub embedder: Arc<dyn IEmbeddingProvider>,
    pub relational: Arc<dyn IRelationalStore>,
    pub vectors: Arc<dyn IVectorStore>,
}
