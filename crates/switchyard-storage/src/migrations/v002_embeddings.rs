//! v002: Embedding collections, one row per (collection, row_id).

use rusqlite::Connection;

use switchyard_core::errors::SwitchyardResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SwitchyardResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS embeddings (
            collection  TEXT NOT NULL,
            row_id      INTEGER NOT NULL,
            dimensions  INTEGER NOT NULL,
            embedding   BLOB NOT NULL,
            content     TEXT NOT NULL DEFAULT '',
            model_name  TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (collection, row_id)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
