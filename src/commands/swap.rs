//! `swapbtctowbtc`, `swapwbtctobtc` and `rebalance`.

use std::time::Duration;

use crate::btc::EsploraClient;
use crate::commands::Wallets;
use crate::config::{ConfigStore, Settings};
use crate::error::AppResult;
use crate::evm::EvmHtlc;
use crate::orderbook::{OrderId, OrderbookClient};
use crate::swap::assets::{format_sats, parse_btc_amount, receive_amount, resolve_pair, SwapPair};
use crate::swap::{
    Orchestrator, OrderbookOrchestrator, StepOutcome, SwapContext, SwapPoller, SwapRequest,
};

/// Start a swap of `amount` BTC along `pair` and drive it to redemption.
pub async fn swap(
    store: &ConfigStore,
    settings: &Settings,
    api_key: &str,
    pair: SwapPair,
    amount: &str,
) -> AppResult<Vec<StepOutcome>> {
    let send_amount = parse_btc_amount(amount)?;
    let wallets = Wallets::from_config(store.config(), settings)?;
    let orchestrator = build_orchestrator(settings, api_key, wallets)?;

    let request = SwapRequest {
        pair,
        send_amount,
        receive_amount: receive_amount(send_amount, settings.orderbook.fee_bps),
    };
    let source_address = orchestrator.address_for(pair.from);
    let (_, steps) = execute_swap(
        &orchestrator,
        &source_address,
        request,
        Duration::from_millis(settings.swap.poll_interval_ms),
    )
    .await?;
    Ok(steps)
}

/// `swap` with the pair given as `--from`/`--to` asset names.
pub async fn rebalance(
    store: &ConfigStore,
    settings: &Settings,
    api_key: &str,
    amount: &str,
    from: &str,
    to: &str,
) -> AppResult<Vec<StepOutcome>> {
    let pair = resolve_pair(from, to)?;
    swap(store, settings, api_key, pair, amount).await
}

/// Submit `request` and poll the order on the feed of `source_address`
/// until it is redeemed.
pub async fn execute_swap(
    orchestrator: &dyn Orchestrator,
    source_address: &str,
    request: SwapRequest,
    poll_interval: Duration,
) -> AppResult<(OrderId, Vec<StepOutcome>)> {
    let order_id = orchestrator.swap(request).await?;
    println!(
        "Order {} created: {} {} -> {} {}",
        order_id,
        format_sats(request.send_amount),
        request.pair.from,
        format_sats(request.receive_amount),
        request.pair.to
    );

    let steps = SwapPoller::new(orchestrator, poll_interval)
        .run(order_id, source_address)
        .await?;
    println!("Swap {} complete", order_id);
    Ok((order_id, steps))
}

fn build_orchestrator(
    settings: &Settings,
    api_key: &str,
    wallets: Wallets,
) -> AppResult<OrderbookOrchestrator> {
    let client = OrderbookClient::new(
        &settings.orderbook.url,
        api_key,
        Duration::from_secs(settings.orderbook.request_timeout_secs),
    )?;
    let ctx = SwapContext {
        evm_htlc: EvmHtlc::connect(&settings.evm, &wallets.evm)?,
        evm_wallet: wallets.evm,
        btc_wallet: wallets.bitcoin,
        esplora: EsploraClient::new(
            &settings.bitcoin.esplora_url,
            Duration::from_secs(settings.bitcoin.request_timeout_secs),
        )?,
        fallback_fee_rate: settings.bitcoin.fee_rate_sat_vb,
    };
    Ok(OrderbookOrchestrator::new(
        client,
        &settings.orderbook.ws_url,
        api_key,
        ctx,
    ))
}
