use std::process::ExitCode;

use mes_batch_loader::{cli, record::EquipmentEvent};

#[tokio::main]
async fn main() -> ExitCode {
    cli::run::<EquipmentEvent>("./data/Equipment Events.json").await
}
