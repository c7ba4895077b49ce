use async_trait::async_trait;

use crate::{BatchResult, core::item::SqlValue};

#[cfg(feature = "postgres")]
/// PostgreSQL connection provider.
pub mod postgres;

#[cfg(feature = "sqlite")]
/// SQLite connection provider.
pub mod sqlite;

/// The number of bind parameters in one statement must fit in a `u16`.
pub const BIND_LIMIT: usize = 65535;

/// One multi-row INSERT: a fixed column list and one bind tuple per row.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    /// When set, rows colliding on this column are skipped instead of failing.
    pub conflict_key: Option<&'static str>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl InsertStatement {
    pub fn new(
        table: &'static str,
        columns: &'static [&'static str],
        conflict_key: Option<&'static str>,
    ) -> Self {
        Self {
            table,
            columns,
            conflict_key,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<SqlValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn bind_count(&self) -> usize {
        self.rows.len() * self.columns.len()
    }
}

/// Exclusive connection with an open transaction, lent by a [`ConnectionProvider`].
///
/// The handle owns its pooled connection. Committing or rolling back consumes
/// the handle and returns the connection to the pool; dropping an uncommitted
/// handle rolls the transaction back before the connection is reused.
#[async_trait]
pub trait LoadTransaction: Send {
    /// Executes one INSERT and returns the number of rows written.
    async fn execute(&mut self, statement: &InsertStatement) -> BatchResult<u64>;

    async fn commit(self: Box<Self>) -> BatchResult<()>;

    async fn rollback(self: Box<Self>) -> BatchResult<()>;
}

/// A pool of database connections.
///
/// Loads check out one exclusive connection for the whole transaction with
/// [`begin`](ConnectionProvider::begin); read-only counts go through
/// [`fetch_count`](ConnectionProvider::fetch_count) on any pooled connection.
/// Failures are reported as [`BatchError::Database`](crate::BatchError::Database)
/// and never retried.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Acquires an exclusive connection and begins a transaction on it.
    async fn begin(&self) -> BatchResult<Box<dyn LoadTransaction>>;

    /// Returns `SELECT COUNT(*)` of `table`.
    async fn fetch_count(&self, table: &str) -> BatchResult<i64>;

    /// Closes every connection of the pool.
    async fn close(&self);
}

pub(crate) fn count_query(table: &str) -> String {
    format!("SELECT COUNT(*) AS total FROM {table}")
}

#[cfg(feature = "postgres")]
pub use postgres::PgConnectionProvider;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnectionProvider;
