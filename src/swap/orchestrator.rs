//! The orchestrator seam used by the swap commands and the polling loop.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::orderbook::client::OrderbookClient;
use crate::orderbook::secret::{random_nonce, Secret};
use crate::orderbook::types::CreateOrderRequest;
use crate::orderbook::{Asset, Order, OrderFeed, OrderId, OrderSubscription};
use crate::swap::assets::SwapPair;
use crate::swap::stepper::{HtlcStepper, SwapContext, SwapStep};
use crate::swap::SwapResult;

/// A swap to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    pub pair: SwapPair,
    /// Amount sent, in satoshis.
    pub send_amount: u64,
    /// Amount expected on the destination chain, in satoshis.
    pub receive_amount: u64,
}

/// Creates orders, streams their state and hands out steppers.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Submit a new swap and return its order id.
    async fn swap(&self, request: SwapRequest) -> SwapResult<OrderId>;

    /// Subscribe to the order list of `address`.
    async fn subscribe_orders(&self, address: &str) -> SwapResult<OrderFeed>;

    /// Drop the current subscription.
    async fn unsubscribe_orders(&self) -> SwapResult<()>;

    /// A stepper bound to `order` as it is now.
    fn get_swap(&self, order: &Order) -> Box<dyn SwapStep>;
}

/// Orchestrator backed by the orderbook service and local wallets.
#[derive(Debug)]
pub struct OrderbookOrchestrator {
    client: OrderbookClient,
    ws_url: String,
    api_key: String,
    ctx: Arc<SwapContext>,
    subscription: Mutex<Option<OrderSubscription>>,
}

impl OrderbookOrchestrator {
    pub fn new(client: OrderbookClient, ws_url: &str, api_key: &str, ctx: SwapContext) -> Self {
        Self {
            client,
            ws_url: ws_url.to_string(),
            api_key: api_key.to_string(),
            ctx: Arc::new(ctx),
            subscription: Mutex::new(None),
        }
    }

    /// Address the user holds `asset` at.
    pub fn address_for(&self, asset: Asset) -> String {
        match asset {
            Asset::Btc => self.ctx.btc_wallet.address().to_string(),
            Asset::Wbtc => self.ctx.evm_wallet.address().to_string(),
        }
    }
}

#[async_trait]
impl Orchestrator for OrderbookOrchestrator {
    async fn swap(&self, request: SwapRequest) -> SwapResult<OrderId> {
        let nonce = random_nonce();
        let secret = Secret::derive(&self.ctx.evm_wallet, nonce).await?;

        let order = CreateOrderRequest {
            from_asset: request.pair.from,
            to_asset: request.pair.to,
            send_amount: request.send_amount,
            receive_amount: request.receive_amount,
            send_address: self.address_for(request.pair.from),
            receive_address: self.address_for(request.pair.to),
            secret_hash: secret.hash_hex(),
            nonce,
        };
        Ok(self.client.create_order(&order).await?)
    }

    async fn subscribe_orders(&self, address: &str) -> SwapResult<OrderFeed> {
        let subscription = OrderSubscription::connect(&self.ws_url, &self.api_key, address).await?;
        let feed = subscription.feed();

        let previous = self.subscription.lock().await.replace(subscription);
        if let Some(previous) = previous {
            previous.close().await;
        }
        Ok(feed)
    }

    async fn unsubscribe_orders(&self) -> SwapResult<()> {
        let current = self.subscription.lock().await.take();
        if let Some(subscription) = current {
            subscription.close().await;
        }
        Ok(())
    }

    fn get_swap(&self, order: &Order) -> Box<dyn SwapStep> {
        Box::new(HtlcStepper::new(Arc::clone(&self.ctx), order.clone()))
    }
}
