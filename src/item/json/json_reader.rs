use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;
use serde_json::Value;

use crate::{
    BatchError, BatchResult,
    core::item::RawRecord,
};

/// Produces the ordered records of one input file.
///
/// Implementations must either return every record of the file or fail; a
/// partially read file is never handed to the loader.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn read_records(&self, path: &Path) -> BatchResult<Vec<RawRecord>>;
}

/// Reads a file holding a single top-level JSON array of objects.
///
/// Every element must itself be an object: a number, string, `null` or nested
/// array anywhere in the array fails the whole file with a schema error
/// instead of being loaded as a row of defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRecordSource;

impl JsonRecordSource {
    pub fn new() -> Self {
        Self
    }

    /// Parses an in-memory document; `path` is only used in error messages.
    pub fn parse(path: &Path, content: &[u8]) -> BatchResult<Vec<RawRecord>> {
        let document: Value = serde_json::from_slice(content).map_err(|source| BatchError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let records = match document {
            Value::Array(records) => records,
            other => {
                return Err(BatchError::schema(
                    path,
                    format!("JSON file must contain an array, found {}", kind_of(&other)),
                ));
            }
        };

        if let Some((index, record)) = records.iter().enumerate().find(|(_, r)| !r.is_object()) {
            return Err(BatchError::schema(
                path,
                format!("element {index} is {}, expected an object", kind_of(record)),
            ));
        }

        Ok(records)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[async_trait]
impl RecordSource for JsonRecordSource {
    async fn read_records(&self, path: &Path) -> BatchResult<Vec<RawRecord>> {
        let path = absolute(path);
        info!("Reading JSON file: {}", path.display());

        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {
                let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
                info!("File size: {size_mb:.2} MB");
            }
            _ => return Err(BatchError::NotFound(path)),
        }

        let content = tokio::fs::read(&path)
            .await
            .map_err(|source| BatchError::Io {
                path: path.clone(),
                source,
            })?;

        let records = Self::parse(&path, &content)?;
        info!("Parsed {} objects from JSON file", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::{error::Error, io::Write};

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::*;

    #[tokio::test]
    async fn content_from_file_should_be_read_in_order() -> Result<(), Box<dyn Error>> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"materialId":"MAT-1"}},{{"materialId":"MAT-2"}},{{"materialId":"MAT-3"}}]"#
        )?;

        let records = JsonRecordSource::new().read_records(file.path()).await?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], json!({"materialId": "MAT-1"}));
        assert_eq!(records[2], json!({"materialId": "MAT-3"}));
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let result = JsonRecordSource::new()
            .read_records(Path::new("does/not/exist.json"))
            .await;

        assert!(matches!(result, Err(BatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonRecordSource::new().read_records(dir.path()).await;

        assert!(matches!(result, Err(BatchError::NotFound(_))));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let result = JsonRecordSource::parse(Path::new("bad.json"), b"[{\"a\": 1,]");
        assert!(matches!(result, Err(BatchError::Parse { .. })));
    }

    #[test]
    fn object_document_is_schema_error() {
        let result = JsonRecordSource::parse(Path::new("obj.json"), br#"{"records": []}"#);
        match result {
            Err(BatchError::Schema { reason, .. }) => assert!(reason.contains("an object")),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn scalar_elements_are_schema_error() {
        let result = JsonRecordSource::parse(Path::new("mixed.json"), br#"[{"a": 1}, 42]"#);
        match result {
            Err(BatchError::Schema { reason, .. }) => assert!(reason.starts_with("element 1")),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn null_and_nested_array_elements_are_schema_error() {
        for content in [&br#"[{"a": 1}, null]"#[..], &br#"[[{"a": 1}]]"#[..]] {
            let result = JsonRecordSource::parse(Path::new("nested.json"), content);
            assert!(matches!(result, Err(BatchError::Schema { .. })), "{result:?}");
        }
    }

    #[test]
    fn empty_array_is_accepted() {
        let records = JsonRecordSource::parse(Path::new("empty.json"), b"[]").unwrap();
        assert!(records.is_empty());
    }
}
