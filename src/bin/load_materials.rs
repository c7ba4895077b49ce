use std::process::ExitCode;

use mes_batch_loader::{cli, record::Material};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run::<Material>("./data/Materials.json").await
}
