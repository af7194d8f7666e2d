//! Versioned schema migrations, applied in order on open.

mod v001_catalog_schema;
mod v002_embeddings;

use rusqlite::{params, Connection};
use tracing::info;

use switchyard_core::errors::{StorageError, SwitchyardResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> SwitchyardResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_catalog_schema::migrate),
    (2, v002_embeddings::migrate),
];

/// Latest schema version.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> SwitchyardResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
        info!(version, "applied migration");
    }

    current_version(conn)
}

/// Highest applied version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> SwitchyardResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
