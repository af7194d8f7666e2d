use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::SwitchyardResult;
use crate::models::{ProductCategoryRecord, ProductRecord, SupplierRecord, VectorHit};
use crate::plan::TableQuery;

/// Read-only relational store. Identifiers are always bound as parameters.
#[async_trait]
pub trait IRelationalStore: Send + Sync {
    async fn products_by_ids(&self, ids: &[i64]) -> SwitchyardResult<Vec<ProductRecord>>;

    async fn categories_by_product_ids(
        &self,
        product_ids: &[i64],
    ) -> SwitchyardResult<Vec<ProductCategoryRecord>>;

    /// Category rows looked up by their own `productcategoryid`.
    async fn categories_by_ids(&self, ids: &[i64]) -> SwitchyardResult<Vec<ProductCategoryRecord>>;

    async fn suppliers_by_ids(&self, ids: &[i64]) -> SwitchyardResult<Vec<SupplierRecord>>;

    /// Execute a single-table query. Callers must validate it first.
    async fn query_table(&self, query: &TableQuery) -> SwitchyardResult<Vec<Map<String, Value>>>;
}

/// ANN search over fixed-width embeddings.
#[async_trait]
pub trait IVectorStore: Send + Sync {
    /// Up to `limit` hits from `collection`, ascending distance, ties by ascending id.
    async fn nearest(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> SwitchyardResult<Vec<VectorHit>>;
}
