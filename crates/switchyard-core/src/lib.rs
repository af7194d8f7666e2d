//! # switchyard-core
//!
//! Foundation crate for the switchyard query router.
//! Defines the shared types, traits, errors, config, allowlist registry and
//! plan model. Every other crate in the workspace depends on this.

pub mod allowlist;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod plan;
pub mod route;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use allowlist::AllowlistRegistry;
pub use config::SwitchyardConfig;
pub use errors::{SwitchyardError, SwitchyardResult};
pub use models::ResultEnvelope;
pub use plan::{Operation, Plan};
pub use route::RouteDecision;
pub use traits::CancellationToken;
