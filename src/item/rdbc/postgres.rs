use std::time::Instant;

use async_trait::async_trait;
use log::{debug, info};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction, query_builder::Separated};

use crate::{
    BatchResult,
    config::DbConfig,
    core::item::SqlValue,
    item::rdbc::{ConnectionProvider, InsertStatement, LoadTransaction, count_query},
};

/// Connection provider backed by a PostgreSQL pool.
///
/// # Design
///
/// - The pool is constructed explicitly (from [`DbConfig`] or an existing
///   [`PgPool`]) and closed by the caller with [`ConnectionProvider::close`]
/// - Each load checks out one connection for its whole transaction
/// - List-valued columns are bound as `text[]`
///
/// # Examples
///
/// ```no_run
/// use mes_batch_loader::config::DbConfig;
/// use mes_batch_loader::item::rdbc::{ConnectionProvider, PgConnectionProvider};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = PgConnectionProvider::connect(&DbConfig::default()).await?;
/// let rows = provider.fetch_count("materials").await?;
/// println!("{rows} materials");
/// provider.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PgConnectionProvider {
    pool: PgPool,
}

impl PgConnectionProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool with the configured size and timeouts.
    pub async fn connect(config: &DbConfig) -> BatchResult<Self> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await?;

        info!(
            "Database pool ready: {}:{} (min {}, max {} connections)",
            config.host, config.port, config.min_connections, config.max_connections
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn bind_value(b: &mut Separated<'_, 'static, Postgres, &'static str>, value: &SqlValue) {
    match value {
        SqlValue::Uuid(id) => b.push_bind(*id),
        SqlValue::Text(text) => b.push_bind(text.clone()),
        SqlValue::OptionalText(text) => b.push_bind(text.clone()),
        SqlValue::Integer(number) => b.push_bind(*number),
        SqlValue::Decimal(number) => b.push_bind(*number),
        SqlValue::List(lots) => b.push_bind(lots.to_vec()),
    };
}

/// Builds `INSERT INTO <table> (<columns>) VALUES ($1, ...), (...)`, with an
/// `ON CONFLICT (<key>) DO NOTHING` suffix when the statement has a conflict key.
pub(crate) fn build_insert(statement: &InsertStatement) -> QueryBuilder<'static, Postgres> {
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

struct PgLoadTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LoadTransaction for PgLoadTransaction {
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
impl ConnectionProvider for PgConnectionProvider {
    async fn begin(&self) -> BatchResult<Box<dyn LoadTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgLoadTransaction { tx }))
    }

    async fn fetch_count(&self, table: &str) -> BatchResult<i64> {
        let start = Instant::now();
        let sql = count_query(table);
        let total: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        debug!(
            "Query executed in {}ms | {} rows in {}",
            start.elapsed().as_millis(),
            total,
            table
        );
        Ok(total)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database pool connections closed");
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::core::item::LotList;

    fn statement(conflict_key: Option<&'static str>) -> InsertStatement {
        let mut statement = InsertStatement::new("materials", &["id", "material_id"], conflict_key);
        statement.push_row(vec![
            SqlValue::Uuid(Uuid::from_u128(1)),
            SqlValue::Text("MAT-1".into()),
        ]);
        statement.push_row(vec![
            SqlValue::Uuid(Uuid::from_u128(2)),
            SqlValue::Text("MAT-2".into()),
        ]);
        statement
    }

    #[test]
    fn insert_uses_one_parameter_group_per_row() {
        let query_builder = build_insert(&statement(None));

        assert_eq!(
            query_builder.sql(),
            "INSERT INTO materials (id,material_id) VALUES ($1, $2), ($3, $4)"
        );
    }

    #[test]
    fn conflict_key_adds_do_nothing_clause() {
        let query_builder = build_insert(&statement(Some("material_id")));

        assert!(
            query_builder
                .sql()
                .ends_with("($3, $4) ON CONFLICT (material_id) DO NOTHING")
        );
    }

    #[test]
    fn every_value_kind_is_bound() {
        let mut statement = InsertStatement::new(
            "equipment_events",
            &["id", "notes", "alarm_ts", "qty", "yield", "affected_lots"],
            None,
        );
        statement.push_row(vec![
            SqlValue::Uuid(Uuid::from_u128(9)),
            SqlValue::Text("ok".into()),
            SqlValue::OptionalText(None),
            SqlValue::Integer(3),
            SqlValue::Decimal(99.5),
            SqlValue::List(LotList::new(vec!["X1".into()])),
        ]);

        let query_builder = build_insert(&statement);

        assert!(query_builder.sql().ends_with("VALUES ($1, $2, $3, $4, $5, $6)"));
    }
}
