use benefit_authorizer::application::authorizer::Authorizer;
use benefit_authorizer::config::AuthorizerConfig;
use benefit_authorizer::domain::ports::{BalanceLedgerHandle, MerchantRegistryHandle};
use benefit_authorizer::domain::response::ResponseCode;
use benefit_authorizer::infrastructure::in_memory::{
    InMemoryBalanceLedger, InMemoryMerchantRegistry,
};
use benefit_authorizer::interfaces::csv::reference_reader::{read_balances, read_mappings};
use benefit_authorizer::interfaces::csv::transaction_reader::TransactionReader;
use benefit_authorizer::interfaces::response_writer::ResponseWriter;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Transactions CSV file (header: mcc,amount,merchant)
    input: PathBuf,

    /// Opening balances CSV file (header: category,balance)
    #[arg(long)]
    balances: Option<PathBuf>,

    /// Merchant mappings CSV file (header: merchant,corrected_mcc)
    #[arg(long)]
    mappings: Option<PathBuf>,

    /// Budget for a single authorization, in milliseconds
    #[arg(long, default_value_t = 100)]
    timeout_ms: u64,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn open_stores(db_path: Option<PathBuf>) -> Result<(MerchantRegistryHandle, BalanceLedgerHandle)> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = db_path {
        use benefit_authorizer::infrastructure::rocksdb::RocksDBStore;

        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        let registry: MerchantRegistryHandle = Arc::new(store.clone());
        let ledger: BalanceLedgerHandle = Arc::new(store);
        return Ok((registry, ledger));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    let registry: MerchantRegistryHandle = Arc::new(InMemoryMerchantRegistry::new());
    let ledger: BalanceLedgerHandle = Arc::new(InMemoryBalanceLedger::new());
    Ok((registry, ledger))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (registry, ledger) = open_stores(cli.db_path)?;

    if let Some(path) = cli.mappings {
        let mappings = read_mappings(File::open(path).into_diagnostic()?).into_diagnostic()?;
        info!(count = mappings.len(), "loading merchant mappings");
        for mapping in mappings {
            registry.register(mapping).await.into_diagnostic()?;
        }
    }

    if let Some(path) = cli.balances {
        let balances = read_balances(File::open(path).into_diagnostic()?).into_diagnostic()?;
        for (category, balance) in balances {
            ledger.upsert(category, balance).await.into_diagnostic()?;
            info!(%category, %balance, "opening balance set");
        }
    }

    let authorizer = Authorizer::new(
        registry,
        ledger,
        AuthorizerConfig::from_millis(cli.timeout_ms),
    );

    // Transactions are authorized one at a time so responses keep input order.
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = TransactionReader::new(file);
    let stdout = io::stdout();
    let mut writer = ResponseWriter::new(stdout.lock());
    for tx_result in reader.transactions() {
        let code = match tx_result {
            Ok(tx) => authorizer.authorize(tx).await,
            Err(e) => {
                warn!(error = %e, "Error reading transaction");
                ResponseCode::Error
            }
        };
        writer.write(code).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    Ok(())
}
