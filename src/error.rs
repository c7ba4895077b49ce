use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by every loader operation.
pub type BatchResult<T> = Result<T, BatchError>;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    /// The input path does not resolve to an existing file.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input file exists but could not be read.
    #[error("Unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file is not valid JSON.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The input is valid JSON but not an array of objects.
    #[error("{}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },

    /// A record could not be mapped to a row of its table.
    #[error("Record {index} does not map to a {table} row: {source}")]
    Record {
        table: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Connection, statement or transaction failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BatchError {
    pub fn schema(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for the kinds raised by the record source, before any database work.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Io { .. } | Self::Parse { .. } | Self::Schema { .. }
        )
    }
}
