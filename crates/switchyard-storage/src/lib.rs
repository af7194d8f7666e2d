//! # switchyard-storage
//!
//! SQLite reference implementation of the relational store and the vector
//! store. One connection behind an async mutex, versioned migrations, and
//! parameterized read queries only.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use switchyard_core::errors::{StorageError, SwitchyardError};

/// Wrap a SQLite failure message as a storage error.
pub(crate) fn to_storage_err(message: impl Into<String>) -> SwitchyardError {
    StorageError::SqliteError {
        message: message.into(),
    }
    .into()
}
