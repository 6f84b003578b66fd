//! `createevmwallet`, `createbitcoinwallet` and `getdetails`.

use crate::btc::{self, BitcoinWallet};
use crate::commands::{bitcoin_wallet, evm_wallet};
use crate::config::{ConfigStore, Settings};
use crate::error::AppResult;
use crate::evm::EvmWallet;

/// Store an EVM private key and return the wallet address.
///
/// The key is checked by building the wallet before anything is written.
pub fn create_evm_wallet(
    store: &mut ConfigStore,
    settings: &Settings,
    private_key: &str,
) -> AppResult<String> {
    let wallet = EvmWallet::from_private_key(private_key, settings.evm.chain_id)?;
    let address = wallet.address().to_string();

    store.config_mut().evm_private_key = Some(private_key.trim().to_string());
    store.persist()?;

    tracing::info!(address = %address, path = %store.path().display(), "EVM wallet saved");
    println!("EVM wallet created: {}", address);
    Ok(address)
}

/// Store a Bitcoin private key (WIF or hex) and return the wallet address.
pub fn create_bitcoin_wallet(
    store: &mut ConfigStore,
    settings: &Settings,
    private_key: &str,
) -> AppResult<String> {
    let network = btc::parse_network(&settings.bitcoin.network)?;
    let wallet = BitcoinWallet::from_private_key(private_key, network)?;
    let address = wallet.address().to_string();

    store.config_mut().bitcoin_private_key = Some(private_key.trim().to_string());
    store.persist()?;

    tracing::info!(address = %address, network = %network, "Bitcoin wallet saved");
    println!("Bitcoin wallet created: {}", address);
    Ok(address)
}

/// Addresses of the configured wallets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletDetails {
    pub evm_address: Option<String>,
    pub bitcoin_address: Option<String>,
}

/// Print the address of every configured wallet.
pub fn get_details(store: &ConfigStore, settings: &Settings) -> AppResult<WalletDetails> {
    let details = WalletDetails {
        evm_address: evm_wallet(store.config(), settings)?.map(|w| w.address().to_string()),
        bitcoin_address: bitcoin_wallet(store.config(), settings)?
            .map(|w| w.address().to_string()),
    };

    println!(
        "EVM address: {}",
        details.evm_address.as_deref().unwrap_or("not configured")
    );
    println!(
        "Bitcoin address: {}",
        details.bitcoin_address.as_deref().unwrap_or("not configured")
    );
    Ok(details)
}
