//! Swap orchestrator ("orderbook") integration.
//!
//! # Data Flow
//! ```text
//! CreateOrderRequest → client.rs (POST /orders) → OrderId
//! address → subscription.rs (WebSocket) → watch<Vec<Order>>
//! Order → status.rs (parse_status) → Action
//! nonce + EVM wallet → secret.rs → Secret / secret hash
//! ```

use thiserror::Error;

pub mod client;
pub mod secret;
pub mod status;
pub mod subscription;
pub mod types;

pub use client::OrderbookClient;
pub use secret::Secret;
pub use status::{parse_status, Action};
pub use subscription::{OrderFeed, OrderSubscription};
pub use types::{Asset, AtomicSwap, Chain, Order, OrderId, OrderStatus, SwapStatus};

/// Errors talking to the orderbook.
#[derive(Debug, Error)]
pub enum OrderbookError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Orderbook answered with a non-success status.
    #[error("orderbook returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// WebSocket connect, send or receive failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The order feed ended while a swap was being tracked.
    #[error("order feed closed")]
    FeedClosed,

    /// The API key contains characters not allowed in a header.
    #[error("API key is not a valid header value")]
    InvalidApiKey,
}

/// Result type for orderbook operations.
pub type OrderbookResult<T> = Result<T, OrderbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = OrderbookError::Api {
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(err.to_string(), "orderbook returned status 401: unauthorized");
    }
}
