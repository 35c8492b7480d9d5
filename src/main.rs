//! Console wallet for native-currency transfers on a configured test network.
//!
//! # Architecture Overview
//!
//! ```text
//!   console command ──▶ ui::App ──▶ session (connect/disconnect/balance)
//!                              └──▶ transfer (validate, submit, confirm)
//!                                        │
//!                                        ▼
//!                        provider::WalletProvider (capability trait)
//!                                        │
//!                                        ▼
//!                        alloy JSON-RPC + local signing key
//!
//!   confirmed transfers ──▶ history::TransactionLog (one JSON file)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use sepolia_wallet::config::{load_config, WalletConfig};
use sepolia_wallet::history::TransactionLog;
use sepolia_wallet::observability::logging;
use sepolia_wallet::provider::rpc::RpcWalletProvider;
use sepolia_wallet::ui::App;

#[derive(Debug, Parser)]
#[command(
    name = "sepolia-wallet",
    about = "Send native-currency transfers on the Sepolia test network"
)]
struct Opt {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the persisted transfer history
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();

    let config = match &opt.config {
        Some(path) => load_config(path)?,
        None => WalletConfig::default(),
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        chain_id = config.network.chain_id,
        chain = %config.network.chain_name,
        rpc_url = %config.network.rpc_urls.first().map(String::as_str).unwrap_or("<none>"),
        "configuration loaded"
    );

    let history_path = config.storage.history_path(opt.data_dir.as_deref());
    let log = TransactionLog::load(history_path);

    let provider = RpcWalletProvider::connect(&config.network, config.provider.rpc_timeout_secs)?;

    let app = App::new(Arc::new(provider), &config, log);
    app.run().await;

    Ok(())
}
