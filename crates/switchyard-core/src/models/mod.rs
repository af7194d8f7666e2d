mod catalog;
mod degradation_event;
mod envelope;
mod result_row;
mod vector_hit;

pub use catalog::{ProductCategoryRecord, ProductRecord, SupplierRecord};
pub use degradation_event::DegradationEvent;
pub use envelope::{EnvelopeMeta, ErrorPayload, ResultEnvelope};
pub use result_row::{ProductWithPrice, ResultRow, SupplierSummary};
pub use vector_hit::VectorHit;
