//! Test fixture loader and test doubles for switchyard integration tests.
//!
//! Provides the JSON catalog, golden planner cases, a seeded in-memory store,
//! and deterministic stand-ins for the external completion and embedding
//! services.

mod doubles;
mod embedder;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use switchyard_core::models::{ProductCategoryRecord, ProductRecord, SupplierRecord};
use switchyard_core::traits::IEmbeddingProvider;
use switchyard_storage::StorageEngine;

pub use doubles::{FailingEmbedder, FixedVectorStore, Scripted, ScriptedCompletion};
pub use embedder::HashEmbedder;

/// Root directory of the fixture files.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

pub fn suppliers() -> Vec<SupplierRecord> {
    load_fixture("catalog/suppliers.json")
}

pub fn products() -> Vec<ProductRecord> {
    load_fixture("catalog/products.json")
}

pub fn categories() -> Vec<ProductCategoryRecord> {
    load_fixture("catalog/productcategory.json")
}

/// One golden heuristic planner case.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerCase {
    pub input: String,
    pub plan: serde_json::Value,
}

pub fn planner_cases() -> Vec<PlannerCase> {
    load_fixture("golden/planner_cases.json")
}

/// Text embedded for a product row.
pub fn product_text(p: &ProductRecord) -> String {
    format!(
        "{} {}",
        p.product_name,
        p.description.as_deref().unwrap_or_default()
    )
}

/// In-memory store holding the fixture catalog plus [`HashEmbedder`]
/// embeddings for the `products`, `suppliers` and `productcategory`
/// collections.
///
/// # Panics
/// Panics if any insert fails.
pub async fn seeded_storage() -> StorageEngine {
    let storage = StorageEngine::open_in_memory().expect("open in-memory storage");
    let embedder = HashEmbedder::new();
    let model = embedder.name().to_string();

    let suppliers = suppliers();
    let products = products();
    let categories = categories();

    for s in &suppliers {
        storage.insert_supplier(s).await.expect("insert supplier");
        let text = format!(
            "{} {}",
            s.supplier_name,
            s.address.as_deref().unwrap_or_default()
        );
        let emb = embedder.embed(&text).await.expect("embed supplier");
        storage
            .store_embedding("suppliers", s.supplier_id, &emb, &text, &model)
            .await
            .expect("store supplier embedding");
    }

    for p in &products {
        storage.insert_product(p).await.expect("insert product");
        let text = product_text(p);
        let emb = embedder.embed(&text).await.expect("embed product");
        storage
            .store_embedding("products", p.product_id, &emb, &text, &model)
            .await
            .expect("store product embedding");
    }

    for c in &categories {
        storage.insert_category(c).await.expect("insert category");
        let name = products
            .iter()
            .find(|p| p.product_id == c.product_id)
            .map(|p| p.product_name.as_str())
            .unwrap_or_default();
        let text = format!(
            "{} {} {}",
            c.color.as_deref().unwrap_or_default(),
            c.age_size.as_deref().unwrap_or_default(),
            name
        );
        let emb = embedder.embed(&text).await.expect("embed category");
        storage
            .store_embedding("productcategory", c.product_category_id, &emb, &text, &model)
            .await
            .expect("store category embedding");
    }

    storage
}
