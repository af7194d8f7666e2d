use serde::{Deserialize, Serialize};

/// Row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "productid")]
    pub product_id: i64,
    #[serde(rename = "productname")]
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "supplierid", default)]
    pub supplier_id: Option<i64>,
    #[serde(rename = "image_url", default)]
    pub image_url: Option<String>,
    #[serde(rename = "createdat", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedat", default)]
    pub updated_at: Option<String>,
}

/// Row of the `productcategory` table: one priced variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCategoryRecord {
    #[serde(rename = "productcategoryid")]
    pub product_category_id: i64,
    #[serde(rename = "productid")]
    pub product_id: i64,
    pub price: f64,
    pub cost: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "agesize", default)]
    pub age_size: Option<String>,
    #[serde(rename = "currentstock", default)]
    pub current_stock: i64,
    #[serde(rename = "reorderpoint", default)]
    pub reorder_point: Option<i64>,
    #[serde(rename = "updatedstock", default)]
    pub updated_stock: Option<String>,
}

/// Row of the `suppliers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    #[serde(rename = "supplierid")]
    pub supplier_id: i64,
    #[serde(rename = "suppliername")]
    pub supplier_name: String,
    #[serde(rename = "contactperson", default)]
    pub contact_person: Option<String>,
    #[serde(rename = "phonenumber", default)]
    pub phone_number: Option<String>,
    #[serde(rename = "supplieremail", default)]
    pub supplier_email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "supplierstatus", default)]
    pub supplier_status: Option<String>,
    #[serde(rename = "defectreturned", default)]
    pub defect_returned: Option<i64>,
}
