//! Test doubles for the record source and the connection provider.
use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use mes_batch_loader::{
    BatchError, BatchResult,
    core::item::RawRecord,
    item::{
        json::RecordSource,
        rdbc::{ConnectionProvider, InsertStatement, LoadTransaction},
    },
};
use mockall::mock;

mock! {
    pub Source {}
    #[async_trait]
    impl RecordSource for Source {
        async fn read_records(&self, path: &Path) -> BatchResult<Vec<RawRecord>>;
    }
}

/// What a [`RecordingProvider`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Count(String),
    Begin,
    /// One INSERT with this many rows.
    Insert(usize),
    Commit,
    Rollback,
}

/// Provider that journals every call instead of talking to a database.
#[derive(Debug, Clone, Default)]
pub struct RecordingProvider {
    journal: Arc<Mutex<Vec<Call>>>,
    existing_rows: i64,
    fail_on_insert: Option<usize>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports this many rows for every count query.
    pub fn with_existing_rows(mut self, rows: i64) -> Self {
        self.existing_rows = rows;
        self
    }

    /// Fails the n-th INSERT (1-based) of a transaction.
    pub fn failing_on_insert(mut self, n: usize) -> Self {
        self.fail_on_insert = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.lock().unwrap().clone()
    }

    pub fn insert_sizes(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Insert(rows) => Some(rows),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: Call) {
        self.journal.lock().unwrap().push(call);
    }
}

struct RecordingTransaction {
    provider: RecordingProvider,
    inserts: usize,
}

#[async_trait]
impl LoadTransaction for RecordingTransaction {
    async fn execute(&mut self, statement: &InsertStatement) -> BatchResult<u64> {
        self.inserts += 1;
        if self.provider.fail_on_insert == Some(self.inserts) {
            return Err(BatchError::Database(sqlx::Error::Protocol(
                "connection reset".to_string(),
            )));
        }

        self.provider.push(Call::Insert(statement.len()));
        Ok(statement.len() as u64)
    }

    async fn commit(self: Box<Self>) -> BatchResult<()> {
        self.provider.push(Call::Commit);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> BatchResult<()> {
        self.provider.push(Call::Rollback);
        Ok(())
    }
}

#[async_trait]
impl ConnectionProvider for RecordingProvider {
    async fn begin(&self) -> BatchResult<Box<dyn LoadTransaction>> {
        self.push(Call::Begin);
        Ok(Box::new(RecordingTransaction {
            provider: self.clone(),
            inserts: 0,
        }))
    }

    async fn fetch_count(&self, table: &str) -> BatchResult<i64> {
        self.push(Call::Count(table.to_string()));
        Ok(self.existing_rows)
    }

    async fn close(&self) {}
}
