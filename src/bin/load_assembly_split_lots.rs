use std::process::ExitCode;

use mes_batch_loader::{cli, record::AssemblySplitLot};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run::<AssemblySplitLot>("./data/Assembly Split Lots.json").await
}
