//! swapctl
//!
//! Create Bitcoin and EVM wallets and swap BTC ↔ WBTC through an orderbook.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI (clap) ──▶ commands ──▶ swap::Orchestrator ──▶ orderbook (REST + WebSocket)
//!                     │                 │
//!                     │                 └──▶ swap::poller ──▶ stepper ──▶ btc / evm HTLCs
//!                     ▼
//!        config (~/.swapctl: config.json, api_key, settings.toml)
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use swapctl::commands;
use swapctl::config::loader::load_settings;
use swapctl::observability::{init_tracing, DEFAULT_LOG_LEVEL};
use swapctl::swap::SwapPair;
use swapctl::{ConfigPaths, ConfigStore};

#[derive(Parser)]
#[command(name = "swapctl")]
#[command(about = "Create wallets and swap BTC <-> WBTC", long_about = None)]
struct Cli {
    /// Directory holding config.json, api_key and settings.toml
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save an EVM private key
    #[command(name = "createevmwallet")]
    CreateEvmWallet {
        #[arg(long = "privatekey")]
        private_key: String,
    },
    /// Save a Bitcoin private key (WIF or hex)
    #[command(name = "createbitcoinwallet")]
    CreateBitcoinWallet {
        #[arg(long = "privatekey")]
        private_key: String,
    },
    /// Show wallet addresses
    #[command(name = "getdetails")]
    GetDetails,
    /// Swap WBTC for BTC
    #[command(name = "swapwbtctobtc")]
    SwapWbtcToBtc {
        /// Amount in BTC, e.g. 0.001
        #[arg(long)]
        amount: String,
    },
    /// Swap BTC for WBTC
    #[command(name = "swapbtctowbtc")]
    SwapBtcToWbtc {
        /// Amount in BTC, e.g. 0.001
        #[arg(long)]
        amount: String,
    },
    /// Show BTC, ETH and WBTC balances
    #[command(name = "checkbalances")]
    CheckBalances,
    /// Swap between BTC and WBTC in either direction
    Rebalance {
        /// Amount in BTC, e.g. 0.001
        #[arg(long)]
        amount: String,
        /// Source asset: BTC or WBTC
        #[arg(long)]
        from: String,
        /// Destination asset: WBTC or BTC
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let logging = init_tracing(DEFAULT_LOG_LEVEL);

    let paths = match cli.config_dir {
        Some(dir) => ConfigPaths::in_dir(dir),
        None => ConfigPaths::from_home()?,
    };
    let api_key = paths.read_api_key()?;
    let settings = load_settings(&paths.settings)?;

    logging.set_level(&settings.observability.log_level);
    tracing::debug!(config_dir = %paths.dir.display(), "Configuration loaded");

    let mut store = ConfigStore::load(&paths.dot_config);

    match cli.command {
        Commands::CreateEvmWallet { private_key } => {
            commands::create_evm_wallet(&mut store, &settings, &private_key)?;
        }
        Commands::CreateBitcoinWallet { private_key } => {
            commands::create_bitcoin_wallet(&mut store, &settings, &private_key)?;
        }
        Commands::GetDetails => {
            commands::get_details(&store, &settings)?;
        }
        Commands::SwapWbtcToBtc { amount } => {
            commands::swap(&store, &settings, &api_key, SwapPair::WBTC_TO_BTC, &amount).await?;
        }
        Commands::SwapBtcToWbtc { amount } => {
            commands::swap(&store, &settings, &api_key, SwapPair::BTC_TO_WBTC, &amount).await?;
        }
        Commands::CheckBalances => {
            commands::check_balances(&store, &settings).await?;
        }
        Commands::Rebalance { amount, from, to } => {
            commands::rebalance(&store, &settings, &api_key, &amount, &from, &to).await?;
        }
    }

    Ok(())
}
