//! Top-level error type for command handlers.

use thiserror::Error;

use crate::btc::BitcoinError;
use crate::config::ConfigError;
use crate::evm::EvmError;
use crate::orderbook::OrderbookError;
use crate::swap::SwapError;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// A command needs a wallet that has not been created yet.
    #[error("{0} wallet not configured; run `swapctl create{1}wallet --privatekey <key>` first")]
    MissingWallet(&'static str, &'static str),

    /// `rebalance` was given something other than BTC/WBTC.
    #[error("invalid asset pair {from} -> {to}; expected BTC -> WBTC or WBTC -> BTC")]
    InvalidAssetPair { from: String, to: String },

    #[error("invalid amount {0}")]
    InvalidAmount(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Evm(#[from] EvmError),

    #[error(transparent)]
    Bitcoin(#[from] BitcoinError),

    #[error(transparent)]
    Orderbook(#[from] OrderbookError),

    #[error(transparent)]
    Swap(#[from] SwapError),
}

impl AppError {
    pub fn missing_evm_wallet() -> Self {
        AppError::MissingWallet("EVM", "evm")
    }

    pub fn missing_bitcoin_wallet() -> Self {
        AppError::MissingWallet("Bitcoin", "bitcoin")
    }
}

/// Result type for command handlers.
pub type AppResult<T> = Result<T, AppError>;
