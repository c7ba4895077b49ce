mod common;

use std::{io::Write, sync::Arc};

use mes_batch_loader::{
    BatchError,
    core::{id::SequentialIdGenerator, loader::BatchLoader},
    record::{AssemblyLot, EquipmentEvent, Material},
};
use serde_json::json;
use sqlx::Row;
use tempfile::NamedTempFile;

#[tokio::test(flavor = "multi_thread")]
async fn loads_every_record_in_one_call() -> Result<(), Box<dyn std::error::Error>> {
    let (provider, _database_file) = common::sqlite_provider().await?;
    let loader = BatchLoader::<AssemblyLot>::new(Arc::new(provider.clone()));

    let result = loader
        .insert_many(&common::assembly_lots(1001), 500)
        .await?;

    assert_eq!(result.inserted, 1001);
    assert_eq!(result.batches, 3);
    assert_eq!(loader.get_count().await?, 1001);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_in_second_batch_leaves_table_unchanged() -> Result<(), Box<dyn std::error::Error>>
{
    let (provider, _database_file) = common::sqlite_provider().await?;
    let loader = BatchLoader::<AssemblyLot>::new(Arc::new(provider.clone()));

    let mut records = common::assembly_lots(1001);
    // rejected by the table's CHECK constraint
    records[700]["inQty"] = json!(-1);

    let before = loader.get_count().await?;
    let result = loader.insert_many(&records, 500).await;

    assert!(matches!(result, Err(BatchError::Database(_))));
    assert_eq!(loader.get_count().await?, before);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn non_numeric_quantity_in_second_batch_leaves_table_unchanged()
-> Result<(), Box<dyn std::error::Error>> {
    let (provider, _database_file) = common::sqlite_provider().await?;
    let loader = BatchLoader::<AssemblyLot>::new(Arc::new(provider.clone()));

    let mut records = common::assembly_lots(1001);
    records[650]["inQty"] = json!("n/a");

    let before = loader.get_count().await?;
    let result = loader.insert_many(&records, 500).await;

    match result {
        Err(BatchError::Record { table, index, .. }) => {
            assert_eq!(table, "assembly_mother_lots");
            assert_eq!(index, 650);
        }
        other => panic!("expected a record error, got {other:?}"),
    }
    assert_eq!(loader.get_count().await?, before);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn inserting_twice_doubles_rows() -> Result<(), Box<dyn std::error::Error>> {
    let (provider, _database_file) = common::sqlite_provider().await?;
    let loader = BatchLoader::<AssemblyLot>::new(Arc::new(provider.clone()));
    let records = common::assembly_lots(40);

    loader.insert_many(&records, 15).await?;
    loader.insert_many(&records, 15).await?;

    assert_eq!(loader.get_count().await?, 80);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_materials_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let (provider, _database_file) = common::sqlite_provider().await?;
    let loader = BatchLoader::<Material>::new(Arc::new(provider.clone()));
    let records = common::materials(30);

    let first = loader.insert_many(&records, 10).await?;
    let second = loader.insert_many(&records, 10).await?;

    assert_eq!(first.inserted, 30);
    assert_eq!(first.ignored, 0);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.ignored, 30);
    assert_eq!(loader.get_count().await?, 30);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn partially_colliding_materials_insert_the_rest() -> Result<(), Box<dyn std::error::Error>> {
    let (provider, _database_file) = common::sqlite_provider().await?;
    let loader = BatchLoader::<Material>::new(Arc::new(provider.clone()));

    loader.insert_many(&common::materials(3), 500).await?;
    let result = loader.insert_many(&common::materials(5), 500).await?;

    assert_eq!(result.total, 5);
    assert_eq!(result.inserted, 2);
    assert_eq!(result.ignored, 3);
    assert_eq!(loader.get_count().await?, 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn process_file_loads_then_skips() -> Result<(), Box<dyn std::error::Error>> {
    let (provider, _database_file) = common::sqlite_provider().await?;
    let loader = BatchLoader::<AssemblyLot>::new(Arc::new(provider.clone()));

    let mut input = NamedTempFile::new()?;
    input.write_all(serde_json::to_string(&common::assembly_lots(12))?.as_bytes())?;

    let first = loader.process_file(input.path(), 5).await?;
    let second = loader.process_file(input.path(), 5).await?;

    assert!(!first.skipped);
    assert_eq!(first.inserted, 12);
    assert!(second.skipped);
    assert_eq!(second.inserted, 0);
    assert_eq!(loader.get_count().await?, 12);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rows_carry_defaults_and_list_literals() -> Result<(), Box<dyn std::error::Error>> {
    let (provider, _database_file) = common::sqlite_provider().await?;
    let loader = BatchLoader::<EquipmentEvent>::new(Arc::new(provider.clone()))
        .id_generator(Arc::new(SequentialIdGenerator::starting_at(1)));

    let records = vec![
        json!({ "eventId": "E1" }),
        json!({ "eventId": "E2", "affectedLots": "X1", "alarmTs": "2024-03-01T10:00:00Z" }),
        json!({ "eventId": "E3", "affectedLots": ["X1", "X2"], "resolutionTime": "" }),
    ];
    loader.insert_many(&records, 500).await?;

    let rows = sqlx::query(
        "SELECT id, event_id, eqp_id, alarm_ts, resolution_time, affected_lots \
         FROM equipment_events ORDER BY event_id",
    )
    .fetch_all(provider.pool())
    .await?;

    let lots: Vec<String> = rows.iter().map(|row| row.get("affected_lots")).collect();
    assert_eq!(lots, vec!["{}", "{X1}", "{X1,X2}"]);

    let first_id: String = rows[0].get("id");
    assert_eq!(first_id, "00000000-0000-0000-0000-000000000001");

    let eqp_id: String = rows[0].get("eqp_id");
    assert_eq!(eqp_id, "");

    let alarm_ts: Vec<Option<String>> = rows.iter().map(|row| row.get("alarm_ts")).collect();
    assert_eq!(
        alarm_ts,
        vec![None, Some("2024-03-01T10:00:00Z".to_string()), None]
    );

    let resolution: Option<String> = rows[2].get("resolution_time");
    assert_eq!(resolution, None);
    Ok(())
}
