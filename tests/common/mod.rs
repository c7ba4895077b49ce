#![allow(dead_code)]

mod mocks;

use std::path::Path;

use mes_batch_loader::{core::item::RawRecord, item::rdbc::SqliteConnectionProvider};
use serde_json::json;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tempfile::NamedTempFile;

pub use mocks::{Call, MockSource, RecordingProvider};

/// Opens a file-backed SQLite database holding the MES tables.
///
/// The returned file must be kept alive for as long as the provider is used.
pub async fn sqlite_provider() -> Result<(SqliteConnectionProvider, NamedTempFile), sqlx::Error> {
    let database_file = NamedTempFile::new()?;
    let options = SqliteConnectOptions::new()
        .filename(database_file.path())
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await?;

    let migrator = Migrator::new(Path::new("tests/migrations/sqlite")).await?;
    migrator.run(&pool).await?;

    Ok((SqliteConnectionProvider::new(pool), database_file))
}

pub fn assembly_lots(count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            json!({
                "lotId": format!("AL-{i:05}"),
                "device": "QFN-48",
                "eqpid": format!("DB-{:02}", i % 7),
                "operationStep": "DIE_ATTACH",
                "materialId": format!("MAT-{:03}", i % 50),
                "inQty": 1000,
                "outQty": 990,
                "yieldStatus": "PASS",
                "trackInTime": "2024-03-01T08:00:00Z",
                "trackOutTime": "2024-03-01T09:30:00Z",
                "operator": "OP1"
            })
        })
        .collect()
}

pub fn materials(count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            json!({
                "materialId": format!("MAT-{i:03}"),
                "vendorId": "V01",
                "vendorName": "Acme Substrates",
                "batchNo": format!("B{i}"),
                "receiptDate": "2024-02-15",
                "consumedInLots": ["AL-00001", "AL-00002"],
                "materialType": "SUBSTRATE",
                "qualityStatus": "RELEASED"
            })
        })
        .collect()
}
