//! Command handlers.
//!
//! Every handler receives the config store and settings explicitly; none
//! of them reach for global state. Progress for the user goes to stdout,
//! diagnostics go through `tracing`.

use crate::btc::{self, BitcoinWallet};
use crate::config::{DotConfig, Settings};
use crate::error::{AppError, AppResult};
use crate::evm::EvmWallet;

pub mod balances;
pub mod swap;
pub mod wallet;

pub use balances::{check_balances, Balances};
pub use swap::{execute_swap, rebalance, swap};
pub use wallet::{create_bitcoin_wallet, create_evm_wallet, get_details, WalletDetails};

/// Both wallets, built from the persisted keys.
#[derive(Debug)]
pub struct Wallets {
    pub evm: EvmWallet,
    pub bitcoin: BitcoinWallet,
}

impl Wallets {
    /// Build both wallets, failing if either key is missing.
    pub fn from_config(config: &DotConfig, settings: &Settings) -> AppResult<Self> {
        Ok(Self {
            evm: evm_wallet(config, settings)?.ok_or_else(AppError::missing_evm_wallet)?,
            bitcoin: bitcoin_wallet(config, settings)?
                .ok_or_else(AppError::missing_bitcoin_wallet)?,
        })
    }
}

/// The EVM wallet, if a key is configured.
pub(crate) fn evm_wallet(config: &DotConfig, settings: &Settings) -> AppResult<Option<EvmWallet>> {
    config
        .evm_private_key
        .as_deref()
        .map(|key| EvmWallet::from_private_key(key, settings.evm.chain_id))
        .transpose()
        .map_err(AppError::from)
}

/// The Bitcoin wallet, if a key is configured.
pub(crate) fn bitcoin_wallet(
    config: &DotConfig,
    settings: &Settings,
) -> AppResult<Option<BitcoinWallet>> {
    let Some(key) = config.bitcoin_private_key.as_deref() else {
        return Ok(None);
    };
    let network = btc::parse_network(&settings.bitcoin.network)?;
    Ok(Some(BitcoinWallet::from_private_key(key, network)?))
}
