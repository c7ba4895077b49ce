use std::process::ExitCode;

use mes_batch_loader::{cli, record::FinalTestLot};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run::<FinalTestLot>("./data/FT.json").await
}
