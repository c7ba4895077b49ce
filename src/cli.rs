use std::{
    ffi::OsString,
    future::Future,
    io,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context;
use clap::{Parser, error::ErrorKind};
use env_logger::Env;
use log::warn;

use crate::{
    config::DbConfig,
    core::{
        item::TableRow,
        loader::{BatchLoader, DEFAULT_BATCH_SIZE, LoadResult},
    },
    item::rdbc::{ConnectionProvider, PgConnectionProvider},
};

const RULE: &str = "========================================";

/// Arguments shared by every loader binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Loads a MES JSON export into PostgreSQL")]
pub struct LoaderArgs {
    /// JSON file to load, defaults to the table's export under ./data
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Records per INSERT statement
    #[arg(short, long, env = "BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    #[command(flatten)]
    pub db: DbConfig,
}

impl LoaderArgs {
    pub fn file_or(&self, default_file: &str) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_file))
    }
}

/// Runs one loader binary end to end and maps the outcome to an exit code.
///
/// Ctrl-C, from connecting until the post-load count, abandons the run: any
/// open transaction is dropped (and so rolled back), the pool is closed and
/// the process exits successfully.
pub async fn run<T: TableRow>(default_file: &str) -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    let file = args.file_or(default_file);

    print_banner::<T>(&args, &file);

    match execute::<T>(&args, &file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Parses the command line; help and version exit 0, any other error exits 1.
pub fn parse_args<I, A>(args: I) -> Result<LoaderArgs, ExitCode>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    LoaderArgs::try_parse_from(args).map_err(|err| {
        let _ = err.print();
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }
    })
}

async fn execute<T: TableRow>(args: &LoaderArgs, file: &Path) -> anyhow::Result<()> {
    let mut connected = None;

    let outcome = until_interrupted(
        connect_and_load::<T>(args, file, &mut connected),
        tokio::signal::ctrl_c(),
    )
    .await
    .unwrap_or_else(|| {
        warn!("Interrupted, closing database connections");
        Ok(())
    });

    if let Some(provider) = connected {
        provider.close().await;
    }
    outcome
}

/// Drives `work` until it finishes or `interrupt` fires, whichever comes first.
///
/// A failing `interrupt` (no signal handler could be installed) is ignored and
/// `work` runs to completion.
async fn until_interrupted<F>(
    work: F,
    interrupt: impl Future<Output = io::Result<()>>,
) -> Option<F::Output>
where
    F: Future,
{
    tokio::select! {
        output = work => Some(output),
        Ok(()) = interrupt => None,
    }
}

async fn connect_and_load<T: TableRow>(
    args: &LoaderArgs,
    file: &Path,
    connected: &mut Option<Arc<PgConnectionProvider>>,
) -> anyhow::Result<()> {
    let provider = Arc::new(
        PgConnectionProvider::connect(&args.db)
            .await
            .with_context(|| format!("connecting to database {}", args.db.display_name()))?,
    );
    *connected = Some(provider.clone());

    let loader = BatchLoader::<T>::new(provider);
    load(&loader, file, args.batch_size).await
}

async fn load<T: TableRow>(
    loader: &BatchLoader<T>,
    file: &Path,
    batch_size: usize,
) -> anyhow::Result<()> {
    let result = loader
        .process_file(file, batch_size)
        .await
        .with_context(|| format!("loading {}", file.display()))?;

    print_summary(&result);

    let count = loader
        .get_count()
        .await
        .with_context(|| format!("counting rows of {}", T::TABLE))?;
    println!("Total records in {}: {}\n", T::TABLE, count);

    Ok(())
}

fn print_banner<T: TableRow>(args: &LoaderArgs, file: &Path) {
    println!("\n{RULE}");
    println!("  {} - PostgreSQL Loader", T::LABEL);
    println!("{RULE}\n");
    println!("Configuration:");
    println!("   Database:   {}", args.db.display_name());
    println!("   JSON File:  {}", file.display());
    println!("   Batch Size: {}\n", args.batch_size);
}

fn print_summary(result: &LoadResult) {
    println!("\n{RULE}");
    println!("          PROCESSING COMPLETE");
    println!("{RULE}");

    if result.skipped {
        println!("   Table already populated, nothing inserted");
    } else {
        println!("   Total Records:    {}", result.total);
        println!("   Inserted:         {}", result.inserted);
        if result.ignored > 0 {
            println!("   Ignored:          {}", result.ignored);
        }
        println!("   Batches:          {}", result.batches);
        println!("   Duration:         {:.2}s", result.duration.as_secs_f64());
        if let Some(rate) = result.records_per_second() {
            println!("   Records/Second:   {}", rate.round());
        }
    }

    println!("{RULE}\n");
}
