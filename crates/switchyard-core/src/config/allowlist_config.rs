use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Allowlist contents. Built into an immutable `AllowlistRegistry` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowlistConfig {
    /// Permitted tables and the columns permitted on each.
    pub tables: BTreeMap<String, Vec<String>>,
    /// Permitted comparison operators.
    pub operators: Vec<String>,
    /// Plan entity name → table name.
    pub entities: BTreeMap<String, String>,
    /// Per-table sort field aliases (alias → canonical column).
    pub sort_aliases: BTreeMap<String, BTreeMap<String, String>>,
    /// Entities that carry an embedding collection.
    pub vector_entities: Vec<String>,
    pub default_limit: usize,
    pub max_limit: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        let mut tables = BTreeMap::new();
        tables.insert(
            "products".to_string(),
            strings(&[
                "productid",
                "productname",
                "description",
                "supplierid",
                "createdat",
                "updatedat",
                "image_url",
                "updatedbyuserid",
            ]),
        );
        tables.insert(
            "suppliers".to_string(),
            strings(&[
                "supplierid",
                "suppliername",
                "contactperson",
                "phonenumber",
                "supplieremail",
                "address",
                "createdat",
                "updatedat",
                "supplierstatus",
                "defectreturned",
            ]),
        );
        tables.insert(
            "productcategory".to_string(),
            strings(&[
                "productcategoryid",
                "productid",
                "price",
                "cost",
                "color",
                "agesize",
                "currentstock",
                "reorderpoint",
                "updatedstock",
            ]),
        );

        let mut entities = BTreeMap::new();
        entities.insert("product".to_string(), "products".to_string());
        entities.insert("supplier".to_string(), "suppliers".to_string());
        entities.insert("productcategory".to_string(), "productcategory".to_string());

        let mut supplier_aliases = BTreeMap::new();
        supplier_aliases.insert("name".to_string(), "suppliername".to_string());
        let mut sort_aliases = BTreeMap::new();
        sort_aliases.insert("suppliers".to_string(), supplier_aliases);

        Self {
            tables,
            operators: strings(&["=", "<", ">", "<=", ">=", "LIKE", "ILIKE"]),
            entities,
            sort_aliases,
            vector_entities: strings(&["product", "supplier", "productcategory"]),
            default_limit: defaults::DEFAULT_ROW_LIMIT,
            max_limit: defaults::DEFAULT_MAX_ROW_LIMIT,
        }
    }
}
