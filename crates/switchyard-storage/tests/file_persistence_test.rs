//! File-backed persistence: data survives close + reopen, WAL is active.

use switchyard_core::config::StorageConfig;
use switchyard_core::models::SupplierRecord;
use switchyard_core::traits::IRelationalStore;
use switchyard_storage::StorageEngine;

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    {
        let engine = StorageEngine::open(&path).unwrap();
        engine
            .insert_supplier(&SupplierRecord {
                supplier_id: 7,
                supplier_name: "Northwind".to_string(),
                contact_person: None,
                phone_number: None,
                supplier_email: Some("ops@northwind.test".to_string()),
                address: None,
                supplier_status: None,
                defect_returned: Some(0),
            })
            .await
            .unwrap();
        assert_eq!(engine.db_path(), Some(path.as_path()));
    }

    let config = StorageConfig {
        db_path: path.to_string_lossy().into_owned(),
        ..StorageConfig::default()
    };
    let engine = StorageEngine::open_with_config(&config).unwrap();
    let suppliers = engine.suppliers_by_ids(&[7]).await.unwrap();
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0].supplier_name, "Northwind");
    assert_eq!(suppliers[0].defect_returned, Some(0));
}

#[test]
fn reopening_does_not_reapply_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twice.db");
    drop(StorageEngine::open(&path).unwrap());
    // A second open must not fail on the already-recorded versions.
    assert!(StorageEngine::open(&path).is_ok());
}

#[test]
fn wal_mode_is_enabled_on_file_databases() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wal.db");
    drop(StorageEngine::open(&path).unwrap());
    let conn = rusqlite::Connection::open(&path).unwrap();
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_ascii_lowercase(), "wal");
}
