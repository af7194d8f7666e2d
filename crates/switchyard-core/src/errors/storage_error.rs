/// Storage-layer errors for the relational and vector stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("unknown vector collection: {collection}")]
    UnknownCollection { collection: String },

    #[error("row decode failed for {table}: {reason}")]
    RowDecode { table: String, reason: String },
}
