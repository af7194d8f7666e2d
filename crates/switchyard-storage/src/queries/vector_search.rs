//! Brute-force inner-product ANN over the `embeddings` table.
//!
//! Distance is the negative inner product, so lower is closer. Results are
//! ordered by ascending distance, ties by ascending row id.

use std::cmp::Ordering;

use rusqlite::{params, Connection};

use switchyard_core::errors::{StorageError, SwitchyardResult};
use switchyard_core::models::VectorHit;

use super::catalog_ops::CatalogTable;
use crate::to_storage_err;

/// Scan `collection` and return up to `limit` nearest rows.
pub fn nearest(
    conn: &Connection,
    collection: &str,
    query_embedding: &[f32],
    limit: usize,
) -> SwitchyardResult<Vec<VectorHit>> {
    ensure_collection(collection)?;
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare("SELECT row_id, embedding, dimensions FROM embeddings WHERE collection = ?1")
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![collection], |row| {
            let row_id: i64 = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            let dimensions: i64 = row.get(2)?;
            Ok((row_id, blob, dimensions))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let query_len = query_embedding.len();
    let mut hits = Vec::new();
    for row in rows {
        let (id, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        // Rows embedded with a different model width are not comparable.
        if dims as usize != query_len {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob, query_len);
        hits.push(VectorHit {
            id,
            distance: -inner_product(query_embedding, &stored),
        });
    }

    hits.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    hits.truncate(limit);
    Ok(hits)
}

/// Insert or replace the embedding of one row.
pub fn store_embedding(
    conn: &Connection,
    collection: &str,
    row_id: i64,
    embedding: &[f32],
    content: &str,
    model_name: &str,
) -> SwitchyardResult<()> {
    ensure_collection(collection)?;
    conn.execute(
        "INSERT INTO embeddings (collection, row_id, dimensions, embedding, content, model_name)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(collection, row_id) DO UPDATE SET
            dimensions = excluded.dimensions,
            embedding = excluded.embedding,
            content = excluded.content,
            model_name = excluded.model_name",
        params![
            collection,
            row_id,
            embedding.len() as i64,
            f32_vec_to_bytes(embedding),
            content,
            model_name,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Collections are named after the catalog tables.
fn ensure_collection(collection: &str) -> SwitchyardResult<()> {
    match CatalogTable::parse(collection) {
        Some(_) => Ok(()),
        None => Err(StorageError::UnknownCollection {
            collection: collection.to_string(),
        }
        .into()),
    }
}

/// Convert f32 slice to bytes (little-endian).
fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to f32 vec.
fn bytes_to_f32_vec(bytes: &[u8], expected_dims: usize) -> Vec<f32> {
    let mut result = Vec::with_capacity(expected_dims);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}

fn inner_product(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_codec_preserves_values() {
        let v = vec![0.25_f32, -1.5, 3.0];
        assert_eq!(bytes_to_f32_vec(&f32_vec_to_bytes(&v), 3), v);
    }

    #[test]
    fn inner_product_matches_manual_sum() {
        assert_eq!(inner_product(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
    }

    #[test]
    fn unknown_collection_is_rejected() {
        assert!(ensure_collection("orders").is_err());
        assert!(ensure_collection("products").is_ok());
    }
}
