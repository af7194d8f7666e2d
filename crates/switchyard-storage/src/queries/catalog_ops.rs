//! Catalog row reads by identifier list, plus the inserts used for seeding.
//!
//! Identifier lists are always bound through `params_from_iter`; the only
//! text spliced into SQL is the `?` placeholder list.

use rusqlite::{params, params_from_iter, Connection, Row};

use switchyard_core::errors::SwitchyardResult;
use switchyard_core::models::{ProductCategoryRecord, ProductRecord, SupplierRecord};

use crate::to_storage_err;

const PRODUCT_COLUMNS: &str =
    "productid, productname, description, supplierid, image_url, createdat, updatedat";
const CATEGORY_COLUMNS: &str = "productcategoryid, productid, price, cost, color, agesize, \
     currentstock, reorderpoint, updatedstock";
const SUPPLIER_COLUMNS: &str = "supplierid, suppliername, contactperson, phonenumber, \
     supplieremail, address, supplierstatus, defectreturned";

/// `?1, ?2, ... ?n`
fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

fn query_by_ids<T>(
    conn: &Connection,
    sql_head: &str,
    ids: &[i64],
    order_by: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> SwitchyardResult<Vec<T>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!("{sql_head} IN ({}) ORDER BY {order_by}", placeholders(ids.len()));
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(ids.iter()), map)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn products_by_ids(conn: &Connection, ids: &[i64]) -> SwitchyardResult<Vec<ProductRecord>> {
    query_by_ids(
        conn,
        &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE productid"),
        ids,
        "productid",
        product_from_row,
    )
}

pub fn categories_by_product_ids(
    conn: &Connection,
    product_ids: &[i64],
) -> SwitchyardResult<Vec<ProductCategoryRecord>> {
    query_by_ids(
        conn,
        &format!("SELECT {CATEGORY_COLUMNS} FROM productcategory WHERE productid"),
        product_ids,
        "productid, productcategoryid",
        category_from_row,
    )
}

pub fn categories_by_ids(
    conn: &Connection,
    ids: &[i64],
) -> SwitchyardResult<Vec<ProductCategoryRecord>> {
    query_by_ids(
        conn,
        &format!("SELECT {CATEGORY_COLUMNS} FROM productcategory WHERE productcategoryid"),
        ids,
        "productcategoryid",
        category_from_row,
    )
}

pub fn suppliers_by_ids(conn: &Connection, ids: &[i64]) -> SwitchyardResult<Vec<SupplierRecord>> {
    query_by_ids(
        conn,
        &format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE supplierid"),
        ids,
        "supplierid",
        supplier_from_row,
    )
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<ProductRecord> {
    Ok(ProductRecord {
        product_id: row.get(0)?,
        product_name: row.get(1)?,
        description: row.get(2)?,
        supplier_id: row.get(3)?,
        image_url: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<ProductCategoryRecord> {
    Ok(ProductCategoryRecord {
        product_category_id: row.get(0)?,
        product_id: row.get(1)?,
        price: row.get(2)?,
        cost: row.get(3)?,
        color: row.get(4)?,
        age_size: row.get(5)?,
        current_stock: row.get(6)?,
        reorder_point: row.get(7)?,
        updated_stock: row.get(8)?,
    })
}

fn supplier_from_row(row: &Row<'_>) -> rusqlite::Result<SupplierRecord> {
    Ok(SupplierRecord {
        supplier_id: row.get(0)?,
        supplier_name: row.get(1)?,
        contact_person: row.get(2)?,
        phone_number: row.get(3)?,
        supplier_email: row.get(4)?,
        address: row.get(5)?,
        supplier_status: row.get(6)?,
        defect_returned: row.get(7)?,
    })
}

pub fn insert_supplier(conn: &Connection, s: &SupplierRecord) -> SwitchyardResult<()> {
    conn.execute(
        "INSERT INTO suppliers (supplierid, suppliername, contactperson, phonenumber,
                                supplieremail, address, supplierstatus, defectreturned)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            s.supplier_id,
            s.supplier_name,
            s.contact_person,
            s.phone_number,
            s.supplier_email,
            s.address,
            s.supplier_status,
            s.defect_returned,
        ],
    )
    .map_err(|e| to_storage_err(format!("insert supplier {}: {e}", s.supplier_id)))?;
    Ok(())
}

pub fn insert_product(conn: &Connection, p: &ProductRecord) -> SwitchyardResult<()> {
    conn.execute(
        "INSERT INTO products (productid, productname, description, supplierid, image_url,
                               createdat, updatedat)
         VALUES (?1, ?2, ?3, ?4, ?5,
                 COALESCE(?6, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                 COALESCE(?7, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')))",
        params![
            p.product_id,
            p.product_name,
            p.description,
            p.supplier_id,
            p.image_url,
            p.created_at,
            p.updated_at,
        ],
    )
    .map_err(|e| to_storage_err(format!("insert product {}: {e}", p.product_id)))?;
    Ok(())
}

pub fn insert_category(conn: &Connection, c: &ProductCategoryRecord) -> SwitchyardResult<()> {
    conn.execute(
        "INSERT INTO productcategory (productcategoryid, productid, price, cost, color, agesize,
                                      currentstock, reorderpoint, updatedstock)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            c.product_category_id,
            c.product_id,
            c.price,
            c.cost,
            c.color,
            c.age_size,
            c.current_stock,
            c.reorder_point,
            c.updated_stock,
        ],
    )
    .map_err(|e| {
        to_storage_err(format!(
            "insert productcategory {}: {e}",
            c.product_category_id
        ))
    })?;
    Ok(())
}

/// Row count of one of the catalog tables.
pub fn count_rows(conn: &Connection, table: CatalogTable) -> SwitchyardResult<usize> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
    let n: i64 = conn
        .query_row(&sql, [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

/// The fixed catalog tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogTable {
    Products,
    Suppliers,
    ProductCategory,
}

impl CatalogTable {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Suppliers => "suppliers",
            Self::ProductCategory => "productcategory",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "products" => Some(Self::Products),
            "suppliers" => Some(Self::Suppliers),
            "productcategory" => Some(Self::ProductCategory),
            _ => None,
        }
    }
}
