//! v001: catalog tables for suppliers, products and productcategory.

use rusqlite::Connection;

use switchyard_core::errors::SwitchyardResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> SwitchyardResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS suppliers (
            supplierid      INTEGER PRIMARY KEY,
            suppliername    TEXT NOT NULL,
            contactperson   TEXT,
            phonenumber     TEXT,
            supplieremail   TEXT,
            address         TEXT,
            createdat       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updatedat       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            supplierstatus  TEXT,
            defectreturned  INTEGER
        );

        CREATE TABLE IF NOT EXISTS products (
            productid        INTEGER PRIMARY KEY,
            productname      TEXT NOT NULL,
            description      TEXT,
            supplierid       INTEGER REFERENCES suppliers(supplierid),
            createdat        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            updatedat        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            image_url        TEXT,
            updatedbyuserid  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_products_supplier ON products(supplierid);

        CREATE TABLE IF NOT EXISTS productcategory (
            productcategoryid  INTEGER PRIMARY KEY,
            productid          INTEGER NOT NULL REFERENCES products(productid) ON DELETE CASCADE,
            price              REAL NOT NULL,
            cost               REAL NOT NULL DEFAULT 0,
            color              TEXT,
            agesize            TEXT,
            currentstock       INTEGER NOT NULL DEFAULT 0,
            reorderpoint       INTEGER,
            updatedstock       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_productcategory_product ON productcategory(productid);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
