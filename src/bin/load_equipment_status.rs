use std::process::ExitCode;

use mes_batch_loader::{cli, record::EquipmentStatus};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run::<EquipmentStatus>("./data/Equipment Status.json").await
}
