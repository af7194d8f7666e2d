//! StorageEngine: owns the connection, runs migrations on open, and
//! implements IRelationalStore + IVectorStore.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::Connection;
use serde_json::{Map, Value};
use tracing::debug;

use switchyard_core::config::defaults::DEFAULT_BUSY_TIMEOUT_MS;
use switchyard_core::config::StorageConfig;
use switchyard_core::errors::SwitchyardResult;
use switchyard_core::models::{ProductCategoryRecord, ProductRecord, SupplierRecord, VectorHit};
use switchyard_core::plan::TableQuery;
use switchyard_core::traits::{IRelationalStore, IVectorStore};

use crate::migrations;
use crate::pool::pragmas::{apply_pragmas, verify_wal_mode};
use crate::pool::SerialConnection;
use crate::queries::catalog_ops::{self, CatalogTable};
use crate::queries::{table_query, vector_search};
use crate::to_storage_err;

/// The main storage engine.
pub struct StorageEngine {
    conn: SerialConnection,
    db_path: Option<PathBuf>,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> SwitchyardResult<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// Open using the `[storage]` configuration section.
    pub fn open_with_config(config: &StorageConfig) -> SwitchyardResult<Self> {
        Self::open_with_timeout(Path::new(&config.db_path), config.busy_timeout_ms)
    }

    fn open_with_timeout(path: &Path, busy_timeout_ms: u32) -> SwitchyardResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        let engine = Self::initialize(conn, busy_timeout_ms, Some(path.to_path_buf()))?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> SwitchyardResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::initialize(conn, DEFAULT_BUSY_TIMEOUT_MS, None)
    }

    /// Apply pragmas and migrations before the connection is shared.
    fn initialize(
        conn: Connection,
        busy_timeout_ms: u32,
        db_path: Option<PathBuf>,
    ) -> SwitchyardResult<Self> {
        apply_pragmas(&conn, busy_timeout_ms)?;
        let version = migrations::run_migrations(&conn)?;
        debug!(
            version,
            wal = verify_wal_mode(&conn).unwrap_or(false),
            path = ?db_path,
            "storage ready"
        );
        Ok(Self {
            conn: SerialConnection::new(conn),
            db_path,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub async fn schema_version(&self) -> SwitchyardResult<u32> {
        self.conn.with_conn(migrations::current_version).await
    }

    pub async fn insert_supplier(&self, supplier: &SupplierRecord) -> SwitchyardResult<()> {
        self.conn
            .with_conn(|conn| catalog_ops::insert_supplier(conn, supplier))
            .await
    }

    pub async fn insert_product(&self, product: &ProductRecord) -> SwitchyardResult<()> {
        self.conn
            .with_conn(|conn| catalog_ops::insert_product(conn, product))
            .await
    }

    pub async fn insert_category(&self, category: &ProductCategoryRecord) -> SwitchyardResult<()> {
        self.conn
            .with_conn(|conn| catalog_ops::insert_category(conn, category))
            .await
    }

    /// Store the embedding of one row in a collection named after its table.
    pub async fn store_embedding(
        &self,
        collection: &str,
        row_id: i64,
        embedding: &[f32],
        content: &str,
        model_name: &str,
    ) -> SwitchyardResult<()> {
        self.conn
            .with_conn(|conn| {
                vector_search::store_embedding(conn, collection, row_id, embedding, content, model_name)
            })
            .await
    }

    pub async fn count_rows(&self, table: CatalogTable) -> SwitchyardResult<usize> {
        self.conn
            .with_conn(|conn| catalog_ops::count_rows(conn, table))
            .await
    }
}

#[async_trait]
impl IRelationalStore for StorageEngine {
    async fn products_by_ids(&self, ids: &[i64]) -> SwitchyardResult<Vec<ProductRecord>> {
        self.conn
            .with_conn(|conn| catalog_ops::products_by_ids(conn, ids))
            .await
    }

    async fn categories_by_product_ids(
        &self,
        product_ids: &[i64],
    ) -> SwitchyardResult<Vec<ProductCategoryRecord>> {
        self.conn
            .with_conn(|conn| catalog_ops::categories_by_product_ids(conn, product_ids))
            .await
    }

    async fn categories_by_ids(&self, ids: &[i64]) -> SwitchyardResult<Vec<ProductCategoryRecord>> {
        self.conn
            .with_conn(|conn| catalog_ops::categories_by_ids(conn, ids))
            .await
    }

    async fn suppliers_by_ids(&self, ids: &[i64]) -> SwitchyardResult<Vec<SupplierRecord>> {
        self.conn
            .with_conn(|conn| catalog_ops::suppliers_by_ids(conn, ids))
            .await
    }

    async fn query_table(&self, query: &TableQuery) -> SwitchyardResult<Vec<Map<String, Value>>> {
        self.conn
            .with_conn(|conn| table_query::run_table_query(conn, query))
            .await
    }
}

#[async_trait]
impl IVectorStore for StorageEngine {
    async fn nearest(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> SwitchyardResult<Vec<VectorHit>> {
        self.conn
            .with_conn(|conn| vector_search::nearest(conn, collection, query, limit))
            .await
    }
}
