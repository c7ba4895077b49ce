//! JSON input for the loaders.
//!
//! Every input file is a single top-level JSON array of objects. The whole
//! file is read and validated before any database work starts, so a malformed
//! file never produces a partial load.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//! use mes_batch_loader::item::json::JsonRecordSource;
//!
//! let records = JsonRecordSource::parse(
//!     Path::new("inline.json"),
//!     br#"[{"materialId": "MAT-001", "consumedInLots": ["AL-1", "AL-2"]}]"#,
//! )
//! .unwrap();
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0]["materialId"], "MAT-001");
//! ```

/// A module providing the JSON record source.
pub mod json_reader;

// Re-export the main types for easier access
pub use json_reader::{JsonRecordSource, RecordSource};
