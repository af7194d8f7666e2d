mod hybrid_service;
mod sql_service;
mod vector_service;

pub use hybrid_service::{HybridOutcome, HybridQueryService};
pub use sql_service::{parse_sql_request, SqlQueryService};
pub use vector_service::{parse_vector_request, VectorQueryService, VectorRequest};
