#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # MES Batch Loader

 Loads the JSON exports of a semiconductor Manufacturing Execution System
 (assembly lots, split lots, equipment events and status, final test lots,
 materials) into PostgreSQL.

 Every load is a single transaction: the file is read whole, split into
 multi-row `INSERT` statements of a configurable size and committed at the
 end, or rolled back entirely if any statement fails. A table that already
 holds data is left untouched, so running a loader twice is harmless.

 ## Core Concepts

- **Record source:** reads a file into a list of raw JSON records (`RecordSource`).
- **Table row:** a typed row that maps a raw record to the columns of its table, filling in defaults for missing keys (`TableRow`).
- **Connection provider:** a pool that lends one connection with an open transaction per load (`ConnectionProvider`).
- **Batch loader:** checks the destination count, reads the file and writes it in batches (`BatchLoader`).

 ## Features

| **Feature** | **Description**                                           |
|-------------|-----------------------------------------------------------|
| postgres    | PostgreSQL connection provider, configuration and loaders |
| sqlite      | SQLite connection provider, for local runs and tests      |
| full        | Enables all available features                            |

 ## Getting Started

 Each table has its own binary (`load-materials`, `load-final-test-lots`, ...)
 configured from the command line or the environment:

```text
DB_HOST=localhost DB_NAME=mes DB_USER=mes DB_PASSWORD=secret \
    load-materials --file ./data/Materials.json --batch-size 1000
```

 The loader can also be driven from code:

```rust
# use std::sync::Arc;
# use mes_batch_loader::{
#     core::{id::SequentialIdGenerator, loader::BatchLoader},
#     item::rdbc::{ConnectionProvider, SqliteConnectionProvider},
#     record::Material,
# };
# use serde_json::json;
# #[tokio::main]
# async fn main() -> Result<(), Box<dyn std::error::Error>> {
# let pool = sqlx::sqlite::SqlitePoolOptions::new()
#     .max_connections(1)
#     .connect("sqlite::memory:")
#     .await?;
# sqlx::query("CREATE TABLE materials (id TEXT PRIMARY KEY, material_id TEXT UNIQUE, vendor_id TEXT, vendor_name TEXT, batch_no TEXT, receipt_date TEXT, consumed_in_lots TEXT, material_type TEXT, quality_status TEXT)")
#     .execute(&pool)
#     .await?;
let provider = Arc::new(SqliteConnectionProvider::new(pool));
let loader = BatchLoader::<Material>::new(provider.clone())
    .id_generator(Arc::new(SequentialIdGenerator::starting_at(1)));

let records = vec![
    json!({ "materialId": "MAT-1", "vendorName": "Acme" }),
    json!({ "materialId": "MAT-2", "consumedInLots": ["L1", "L2"] }),
];
let result = loader.insert_many(&records, 500).await?;

assert_eq!(result.inserted, 2);
assert_eq!(loader.get_count().await?, 2);
provider.close().await;
# Ok(())
# }
```

 The example above needs the `sqlite` feature.
 */

/// Database configuration taken from the command line and the environment
#[cfg(feature = "postgres")]
pub mod config;

/// Shared entry point of the loader binaries
#[cfg(feature = "postgres")]
pub mod cli;

/// Core module for batch loading
pub mod core;

/// Error types for batch loading
pub mod error;

#[doc(inline)]
pub use error::*;

/// Record sources and database providers
pub mod item;

/// Typed rows of the destination tables
pub mod record;
