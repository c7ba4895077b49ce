use std::{
    marker::PhantomData,
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};

use crate::{
    BatchError, BatchResult,
    core::{
        id::{IdGenerator, RandomIdGenerator},
        item::{RawRecord, TableRow},
    },
    item::{
        json::{JsonRecordSource, RecordSource},
        rdbc::{BIND_LIMIT, ConnectionProvider, InsertStatement, LoadTransaction},
    },
};

/// Default number of records per INSERT statement.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// A table holding more rows than this is considered already loaded.
pub const DEFAULT_SKIP_THRESHOLD: i64 = 5;

/// Summary of one load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    /// Records read from the source.
    pub total: usize,
    /// Rows actually written.
    pub inserted: u64,
    /// Rows discarded because their business key already existed.
    pub ignored: u64,
    /// INSERT statements issued.
    pub batches: usize,
    pub duration: Duration,
    /// The table was already populated and nothing was read or written.
    pub skipped: bool,
}

impl LoadResult {
    pub fn skipped() -> Self {
        Self {
            total: 0,
            inserted: 0,
            ignored: 0,
            batches: 0,
            duration: Duration::ZERO,
            skipped: true,
        }
    }

    /// Insert throughput, when anything was inserted in a measurable time.
    pub fn records_per_second(&self) -> Option<f64> {
        let seconds = self.duration.as_secs_f64();
        (self.inserted > 0 && seconds > 0.0).then(|| self.inserted as f64 / seconds)
    }
}

/// Loads one JSON file into the table of `T`, atomically.
///
/// A load goes through these states, never backwards:
///
/// ```text
/// Idle -> CountChecked -> SkippedDone
///                      -> Loading -> Committed -> Done
///                                 -> RolledBack (error returned)
/// ```
///
/// All batches of one call run in input order on a single transaction; a
/// failing batch rolls back every batch before it. Batching only bounds
/// statement size, it does not create intermediate commit points.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use mes_batch_loader::{
///     config::DbConfig,
///     core::loader::{BatchLoader, DEFAULT_BATCH_SIZE},
///     item::rdbc::PgConnectionProvider,
///     record::Material,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(PgConnectionProvider::connect(&DbConfig::default()).await?);
/// let loader = BatchLoader::<Material>::new(provider);
///
/// let result = loader.process_file("data/Materials.json", DEFAULT_BATCH_SIZE).await?;
/// println!("{} of {} materials inserted", result.inserted, result.total);
/// # Ok(())
/// # }
/// ```
pub struct BatchLoader<T> {
    provider: Arc<dyn ConnectionProvider>,
    source: Arc<dyn RecordSource>,
    ids: Arc<dyn IdGenerator>,
    skip_threshold: i64,
    _row: PhantomData<fn() -> T>,
}

impl<T: TableRow> BatchLoader<T> {
    /// Creates a loader reading JSON files and generating random ids.
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self {
            provider,
            source: Arc::new(JsonRecordSource::new()),
            ids: Arc::new(RandomIdGenerator),
            skip_threshold: DEFAULT_SKIP_THRESHOLD,
            _row: PhantomData,
        }
    }

    pub fn source(mut self, source: Arc<dyn RecordSource>) -> Self {
        self.source = source;
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Row count above which [`process_file`](Self::process_file) skips the load.
    pub fn skip_threshold(mut self, threshold: i64) -> Self {
        self.skip_threshold = threshold;
        self
    }

    /// Current row count of the destination table.
    pub async fn get_count(&self) -> BatchResult<i64> {
        self.provider.fetch_count(T::TABLE).await
    }

    /// Loads `path` unless the table already holds data.
    ///
    /// This is a coarse guard against running the same load twice: it does not
    /// look for individual duplicates, it only tells an empty (or nearly
    /// empty) table from a populated one.
    pub async fn process_file(
        &self,
        path: impl AsRef<Path>,
        batch_size: usize,
    ) -> BatchResult<LoadResult> {
        let existing = self.get_count().await?;
        debug!("{}: {} existing rows", T::TABLE, existing);

        if existing > self.skip_threshold {
            info!(
                "Database already has {} records in {}. Skipping insert.",
                existing,
                T::TABLE
            );
            return Ok(LoadResult::skipped());
        }

        let records = self.source.read_records(path.as_ref()).await?;
        self.insert_many(&records, batch_size).await
    }

    /// Inserts `records` in batches of `batch_size` inside one transaction.
    ///
    /// Either every batch is committed or, on the first failure, the whole
    /// transaction is rolled back and the error returned. The connection goes
    /// back to the pool on every path.
    pub async fn insert_many(
        &self,
        records: &[RawRecord],
        batch_size: usize,
    ) -> BatchResult<LoadResult> {
        let batch_size = Self::effective_batch_size(batch_size)?;
        let start = Instant::now();

        let mut tx = self.provider.begin().await?;
        debug!("{}: transaction started", T::TABLE);

        let (inserted, ignored, batches) =
            match self.write_batches(tx.as_mut(), records, batch_size).await {
                Ok(counts) => counts,
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        error!("Rollback of {} failed: {}", T::TABLE, rollback_err);
                    }
                    error!("Transaction rolled back: {}", err);
                    return Err(err);
                }
            };

        if let Err(err) = tx.commit().await {
            error!("Commit of {} failed: {}", T::TABLE, err);
            return Err(err);
        }

        let duration = start.elapsed();
        info!("Transaction committed in {:.2}s", duration.as_secs_f64());
        if ignored > 0 {
            info!(
                "{} records skipped: {} already present",
                ignored,
                T::CONFLICT_KEY.unwrap_or("key")
            );
        }

        Ok(LoadResult {
            total: records.len(),
            inserted,
            ignored,
            batches,
            duration,
            skipped: false,
        })
    }

    /// Validates the requested batch size and clamps it to the bind limit.
    pub fn effective_batch_size(requested: usize) -> BatchResult<usize> {
        if requested == 0 {
            return Err(BatchError::config("batch size must be at least 1"));
        }

        let max = BIND_LIMIT / T::COLUMNS.len();
        if requested > max {
            warn!(
                "Batch size {} exceeds the bind limit for {} ({} columns), using {}",
                requested,
                T::TABLE,
                T::COLUMNS.len(),
                max
            );
            return Ok(max);
        }

        Ok(requested)
    }

    async fn write_batches(
        &self,
        tx: &mut dyn LoadTransaction,
        records: &[RawRecord],
        batch_size: usize,
    ) -> BatchResult<(u64, u64, usize)> {
        let total_batches = records.len().div_ceil(batch_size);
        let mut inserted = 0;
        let mut ignored = 0;

        for (batch_index, chunk) in records.chunks(batch_size).enumerate() {
            let statement = self.build_statement(batch_index * batch_size, chunk)?;
            debug!(
                "{}: batch {} binds {} parameters",
                T::TABLE,
                batch_index + 1,
                statement.bind_count()
            );
            let written = tx.execute(&statement).await?;

            inserted += written;
            if T::CONFLICT_KEY.is_some() {
                ignored += (chunk.len() as u64).saturating_sub(written);
            }

            let batch_number = batch_index + 1;
            info!(
                "Batch {}/{} ({}%): Inserted {} records",
                batch_number,
                total_batches,
                batch_number * 100 / total_batches,
                written
            );
        }

        Ok((inserted, ignored, total_batches))
    }

    fn build_statement(&self, offset: usize, chunk: &[RawRecord]) -> BatchResult<InsertStatement> {
        let mut statement = InsertStatement::new(T::TABLE, T::COLUMNS, T::CONFLICT_KEY);

        for (index, record) in chunk.iter().enumerate() {
            let row = T::from_record(record).map_err(|source| BatchError::Record {
                table: T::TABLE,
                index: offset + index,
                source,
            })?;
            statement.push_row(row.bind_tuple(self.ids.next_id()));
        }

        Ok(statement)
    }
}
