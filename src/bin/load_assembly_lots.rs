use std::process::ExitCode;

use mes_batch_loader::{cli, record::AssemblyLot};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run::<AssemblyLot>("./data/Assembly Lots.json").await
}
