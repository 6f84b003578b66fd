//! Order records as served by the orderbook.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orderbook-assigned order identifier.
pub type OrderId = u64;

/// Chain a swap leg lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    Bitcoin,
    Evm,
}

/// Assets the CLI can swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    /// Native bitcoin.
    Btc,
    /// Wrapped BTC (ERC-20) on the EVM chain.
    Wbtc,
}

impl Asset {
    /// Chain holding this asset.
    pub fn chain(self) -> Chain {
        match self {
            Asset::Btc => Chain::Bitcoin,
            Asset::Wbtc => Chain::Evm,
        }
    }

    /// Ticker symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Wbtc => "WBTC",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Lifecycle of the order as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Filled,
    Executed,
    Settled,
    Expired,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Lifecycle of one HTLC leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    NotStarted,
    InitiateDetected,
    Initiated,
    RedeemDetected,
    Redeemed,
    RefundDetected,
    Refunded,
    Expired,
    #[serde(other)]
    Unknown,
}

/// One HTLC leg of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicSwap {
    pub chain: Chain,
    pub asset: Asset,
    /// Address that funds the HTLC and can refund it.
    pub initiator_address: String,
    /// Address that can claim the HTLC with the secret.
    pub redeemer_address: String,
    /// Amount in base units (satoshis for both BTC and WBTC).
    pub amount: u64,
    /// Relative timelock in blocks.
    pub timelock: u64,
    /// On-chain swap identifier (EVM legs).
    #[serde(default)]
    pub swap_id: Option<String>,
    #[serde(default)]
    pub initiate_tx_hash: Option<String>,
    #[serde(default)]
    pub redeem_tx_hash: Option<String>,
    pub status: SwapStatus,
}

/// An order tracked by the orderbook.
///
/// The local user is always the maker: it funds the initiator leg and
/// redeems the follower leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "ID")]
    pub id: OrderId,
    pub maker: String,
    pub status: OrderStatus,
    /// Hex SHA256 of the secret.
    pub secret_hash: String,
    /// Nonce the secret was derived from.
    pub nonce: u64,
    pub initiator_atomic_swap: AtomicSwap,
    pub follower_atomic_swap: AtomicSwap,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub from_asset: Asset,
    pub to_asset: Asset,
    pub send_amount: u64,
    pub receive_amount: u64,
    /// Address funding the source HTLC.
    pub send_address: String,
    /// Address receiving on the destination chain.
    pub receive_address: String,
    pub secret_hash: String,
    pub nonce: u64,
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
}
