//! Vector-only service: `[products|suppliers|categories:] <text> [topk:<n>]`.
//!
//! Embeds the text, runs ANN over the collection, then hydrates each hit
//! from the relational store in ANN order. An embedding failure is a
//! request error; there is no keyword fallback.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info};

use switchyard_core::constants::strip_prefix_ignore_case;
use switchyard_core::errors::SwitchyardResult;
use switchyard_core::traits::{
    CancellationToken, IEmbeddingProvider, IRelationalStore, IVectorStore,
};
use switchyard_core::AllowlistRegistry;

static TOPK_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\btopk:\s*(\d+)").ok());

/// `(prefix, collection)`; the first entry is the default collection.
const COLLECTIONS: &[(&str, &str)] = &[
    ("products:", "products"),
    ("suppliers:", "suppliers"),
    ("categories:", "productcategory"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorRequest {
    pub collection: &'static str,
    pub text: String,
    /// `None` when the request names no count.
    pub topk: Option<usize>,
}

pub fn parse_vector_request(raw: &str) -> VectorRequest {
    let mut text = raw.trim().to_string();
    let mut topk = None;
    if let Some(re) = TOPK_RE.as_ref() {
        if let Some(n) = re.captures(&text).and_then(|c| c.get(1)) {
            topk = n.as_str().parse().ok();
        }
        text = re.replace_all(&text, " ").trim().to_string();
    }

    let (collection, body) = COLLECTIONS
        .iter()
        .find_map(|(prefix, collection)| {
            strip_prefix_ignore_case(&text, prefix).map(|rest| (*collection, rest.to_string()))
        })
        .unwrap_or_else(|| (COLLECTIONS[0].1, text.clone()));

    VectorRequest {
        collection,
        text: body.split_whitespace().collect::<Vec<_>>().join(" "),
        topk,
    }
}

pub struct VectorQueryService {
    embedder: Arc<dyn IEmbeddingProvider>,
    vectors: Arc<dyn IVectorStore>,
    relational: Arc<dyn IRelationalStore>,
    registry: Arc<AllowlistRegistry>,
    default_topk: usize,
}

impl VectorQueryService {
    pub fn new(
        embedder: Arc<dyn IEmbeddingProvider>,
        vectors: Arc<dyn IVectorStore>,
        relational: Arc<dyn IRelationalStore>,
        registry: Arc<AllowlistRegistry>,
        default_topk: usize,
    ) -> Self {
        Self {
            embedder,
            vectors,
            relational,
            registry,
            default_topk,
        }
    }

    /// `[{id, distance, record}]`, nearest first.
    pub async fn dispatch(&self, text: &str, cancel: &CancellationToken) -> SwitchyardResult<Value> {
        cancel.check()?;
        let request = parse_vector_request(text);
        let topk = match request.topk {
            None | Some(0) => self.default_topk,
            Some(n) => n,
        }
        .min(self.registry.max_limit());

        let embedding = cancel
            .run_until_cancelled(self.embedder.embed_query(&request.text))
            .await??;
        let hits = cancel
            .run_until_cancelled(self.vectors.nearest(request.collection, &embedding, topk))
            .await??;
        debug!(collection = request.collection, hits = hits.len(), "ann complete");

        let ids: Vec<i64> = hits.iter().map(|h| h.id).collect();
        let records = cancel
            .run_until_cancelled(self.hydrate(request.collection, &ids))
            .await??;

        let out: Vec<Value> = hits
            .iter()
            .filter_map(|hit| {
                records.get(&hit.id).map(|record| {
                    json!({ "id": hit.id, "distance": hit.distance, "record": record })
                })
            })
            .collect();
        info!(collection = request.collection, results = out.len(), "vector dispatch");
        Ok(Value::Array(out))
    }

    async fn hydrate(&self, collection: &str, ids: &[i64]) -> SwitchyardResult<HashMap<i64, Value>> {
        let mut out = HashMap::with_capacity(ids.len());
        match collection {
            "suppliers" => {
                for s in self.relational.suppliers_by_ids(ids).await? {
                    out.insert(s.supplier_id, serde_json::to_value(&s)?);
                }
            }
            "productcategory" => {
                for c in self.relational.categories_by_ids(ids).await? {
                    out.insert(c.product_category_id, serde_json::to_value(&c)?);
                }
            }
            _ => {
                for p in self.relational.products_by_ids(ids).await? {
                    out.insert(p.product_id, serde_json::to_value(&p)?);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_products() {
        let r = parse_vector_request("  waterproof   jacket ");
        assert_eq!(r.collection, "products");
        assert_eq!(r.text, "waterproof jacket");
        assert_eq!(r.topk, None);
    }

    #[test]
    fn collection_prefix_and_topk() {
        let r = parse_vector_request("Suppliers: harbor docks topk:3");
        assert_eq!(r.collection, "suppliers");
        assert_eq!(r.text, "harbor docks");
        assert_eq!(r.topk, Some(3));

        let r = parse_vector_request("categories: green toddler");
        assert_eq!(r.collection, "productcategory");
    }

    #[test]
    fn topk_anywhere_in_text() {
        let r = parse_vector_request("topk: 7 dino onesie");
        assert_eq!(r.topk, Some(7));
        assert_eq!(r.text, "dino onesie");
    }
}
