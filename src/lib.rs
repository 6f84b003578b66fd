//! Command-line BTC ↔ WBTC atomic swaps.

pub mod btc;
pub mod commands;
pub mod config;
pub mod error;
pub mod evm;
pub mod observability;
pub mod orderbook;
pub mod swap;

pub use config::{ConfigPaths, ConfigStore, Settings};
pub use error::{AppError, AppResult};
