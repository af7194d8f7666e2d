use serde::{Deserialize, Serialize};

use super::catalog::{ProductCategoryRecord, ProductRecord, SupplierRecord};

/// A product joined with its best-priced category row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithPrice {
    pub product_id: i64,
    pub product_name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub supplier_id: Option<i64>,
    pub price: f64,
    pub cost: f64,
    pub product_category_id: i64,
}

impl ProductWithPrice {
    pub fn join(product: &ProductRecord, category: &ProductCategoryRecord) -> Self {
        Self {
            product_id: product.product_id,
            product_name: product.product_name.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            supplier_id: product.supplier_id,
            price: category.price,
            cost: category.cost,
            product_category_id: category.product_category_id,
        }
    }
}

/// Lightweight supplier projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSummary {
    pub supplier_id: i64,
    pub supplier_name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub supplier_email: Option<String>,
}

impl From<&SupplierRecord> for SupplierSummary {
    fn from(s: &SupplierRecord) -> Self {
        Self {
            supplier_id: s.supplier_id,
            supplier_name: s.supplier_name.clone(),
            address: s.address.clone(),
            phone_number: s.phone_number.clone(),
            supplier_email: s.supplier_email.clone(),
        }
    }
}

/// A materialized row produced by a select step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultRow {
    Product(ProductWithPrice),
    Supplier(SupplierSummary),
}
