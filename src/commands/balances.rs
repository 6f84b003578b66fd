//! `checkbalances`.

use alloy::primitives::utils::{format_ether, format_units};
use alloy::primitives::U256;
use std::time::Duration;

use crate::btc::EsploraClient;
use crate::commands::Wallets;
use crate::config::{ConfigStore, Settings};
use crate::error::AppResult;
use crate::evm::htlc::parse_address;
use crate::evm::{EvmClient, EvmError};
use crate::swap::assets::format_sats;

/// WBTC uses bitcoin's 8 decimals.
const WBTC_DECIMALS: u8 = 8;

/// Balances of both wallets in base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balances {
    pub btc_sats: u64,
    pub eth_wei: U256,
    pub wbtc: U256,
}

/// Query and print BTC, ETH and WBTC balances.
pub async fn check_balances(store: &ConfigStore, settings: &Settings) -> AppResult<Balances> {
    let wallets = Wallets::from_config(store.config(), settings)?;

    let esplora = EsploraClient::new(
        &settings.bitcoin.esplora_url,
        Duration::from_secs(settings.bitcoin.request_timeout_secs),
    )?;
    let btc_sats = esplora
        .get_balance(&wallets.bitcoin.address().to_string())
        .await?;

    let evm = EvmClient::new(settings.evm.clone())?;
    evm.verify_chain_id().await?;
    let owner = wallets.evm.address();
    let eth_wei = evm.get_balance(owner).await?;
    let wbtc = evm
        .get_token_balance(parse_address(&evm.config().wbtc_address)?, owner)
        .await?;

    let balances = Balances {
        btc_sats,
        eth_wei,
        wbtc,
    };
    print_balances(&wallets, &balances)?;
    Ok(balances)
}

fn print_balances(wallets: &Wallets, balances: &Balances) -> AppResult<()> {
    let wbtc = format_units(balances.wbtc, WBTC_DECIMALS)
        .map_err(|e| EvmError::InvalidInput(format!("WBTC balance: {}", e)))?;

    println!(
        "BTC  ({}): {}",
        wallets.bitcoin.address(),
        format_sats(balances.btc_sats)
    );
    println!(
        "ETH  ({}): {}",
        wallets.evm.address(),
        format_ether(balances.eth_wei)
    );
    println!("WBTC ({}): {}", wallets.evm.address(), wbtc);
    Ok(())
}
