use async_trait::async_trait;
use log::{debug, info};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction, query_builder::Separated};

use crate::{
    BatchResult,
    core::item::SqlValue,
    item::rdbc::{ConnectionProvider, InsertStatement, LoadTransaction, count_query},
};

/// Connection provider backed by a SQLite pool.
///
/// SQLite has no UUID or array types, so ids are stored as their hyphenated
/// text and list-valued columns as their array literal (`{X1,X2}`). Useful for
/// local runs and tests; the insert and transaction behaviour is the same as
/// on PostgreSQL, including `ON CONFLICT ... DO NOTHING`.
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    pool: SqlitePool,
}

impl SqliteConnectionProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn bind_value(b: &mut Separated<'_, 'static, Sqlite, &'static str>, value: &SqlValue) {
    match value {
        SqlValue::Uuid(id) => b.push_bind(id.to_string()),
        SqlValue::Text(text) => b.push_bind(text.clone()),
        SqlValue::OptionalText(text) => b.push_bind(text.clone()),
        SqlValue::Integer(number) => b.push_bind(*number),
        SqlValue::Decimal(number) => b.push_bind(*number),
        SqlValue::List(lots) => b.push_bind(lots.to_string()),
    };
}

fn build_insert(statement: &InsertStatement) -> QueryBuilder<'static, Sqlite> {
    let mut query_builder = QueryBuilder::new("INSERT INTO ");
    query_builder.push(statement.table);
    query_builder.push(" (");
    query_builder.push(statement.columns.join(","));
    query_builder.push(") ");

    query_builder.push_values(&statement.rows, |mut b, row| {
        for value in row {
            bind_value(&mut b, value);
        }
    });

    if let Some(key) = statement.conflict_key {
        query_builder.push(format!(" ON CONFLICT ({key}) DO NOTHING"));
    }

    query_builder
}

struct SqliteLoadTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl LoadTransaction for SqliteLoadTransaction {
    async fn execute(&mut self, statement: &InsertStatement) -> BatchResult<u64> {
        if statement.is_empty() {
            return Ok(0);
        }

        let mut query_builder = build_insert(statement);
        let result = query_builder.build().execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> BatchResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> BatchResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl ConnectionProvider for SqliteConnectionProvider {
    async fn begin(&self) -> BatchResult<Box<dyn LoadTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteLoadTransaction { tx }))
    }

    async fn fetch_count(&self, table: &str) -> BatchResult<i64> {
        let sql = count_query(table);
        let total: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        debug!("{total} rows in {table}");
        Ok(total)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database pool connections closed");
    }
}
