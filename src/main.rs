use clap::Parser;
use mall_settlement::application::engine::SettlementEngine;
use mall_settlement::application::service::SettlementService;
use mall_settlement::domain::config::load_payment_configs;
use mall_settlement::domain::ports::SettlementStoreBox;
use mall_settlement::infrastructure::in_memory::InMemorySettlementStore;
#[cfg(feature = "storage-rocksdb")]
use mall_settlement::infrastructure::rocksdb::RocksDBStore;
use mall_settlement::interfaces::csv::order_reader::{OrderReader, OrderRow};
use mall_settlement::interfaces::csv::settlement_writer::SettlementWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input orders CSV file
    input: PathBuf,

    /// Payment method config JSON file; overrides the built-in channel defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the settlement report on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut engine = SettlementEngine::new();
    if let Some(path) = cli.config {
        for config in load_payment_configs(path).into_diagnostic()? {
            engine.update_payment_config(config);
        }
    }

    let store: SettlementStoreBox = match cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => Box::new(RocksDBStore::open(db_path).into_diagnostic()?),
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            return Err(miette::miette!(
                "--db-path requires the storage-rocksdb feature"
            ));
        }
        None => Box::new(InMemorySettlementStore::new()),
    };

    let service = SettlementService::new(engine, store);

    // Settle and confirm each order; a bad row fails that row, not the run.
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OrderReader::new(file);
    for row_result in reader.orders() {
        match row_result.and_then(OrderRow::into_request) {
            Ok((order_id, params)) => {
                match service.settle_order(&order_id, &params).await {
                    Ok(_) => {
                        if let Err(e) = service.confirm_order(&order_id).await {
                            tracing::error!(%order_id, error = %e, "Error confirming order");
                        }
                    }
                    Err(e) => tracing::error!(%order_id, error = %e, "Error settling order"),
                }
            }
            Err(e) => tracing::error!(error = %e, "Error reading order"),
        }
    }

    // Output the final settlement report.
    let records = service.into_results().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = SettlementWriter::new(stdout.lock());
    writer.write_records(records).into_diagnostic()?;

    Ok(())
}
