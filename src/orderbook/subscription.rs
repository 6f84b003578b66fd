//! WebSocket order feed.
//!
//! The server pushes the complete list of orders for the subscribed
//! address on every change. The latest list is published on a `watch`
//! channel so readers always see the most recent complete update.

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

use crate::orderbook::client::API_KEY_HEADER;
use crate::orderbook::types::Order;
use crate::orderbook::{OrderbookError, OrderbookResult};

/// Receiving side of an order subscription.
pub type OrderFeed = watch::Receiver<Vec<Order>>;

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum FeedCommand<'a> {
    Subscribe { address: &'a str },
    Unsubscribe,
}

/// A live subscription backed by a reader task.
#[derive(Debug)]
pub struct OrderSubscription {
    feed: OrderFeed,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl OrderSubscription {
    /// Connect to `ws_url` and subscribe to orders for `address`.
    pub async fn connect(ws_url: &str, api_key: &str, address: &str) -> OrderbookResult<Self> {
        let mut request = ws_url.into_client_request()?;
        request.headers_mut().insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key).map_err(|_| OrderbookError::InvalidApiKey)?,
        );

        let (stream, _) = tokio_tungstenite::connect_async(request).await?;
        let (mut sink, mut source) = stream.split();

        let subscribe = serde_json::to_string(&FeedCommand::Subscribe { address })?;
        sink.send(Message::Text(subscribe.into())).await?;
        tracing::info!(address = %address, "Subscribed to order updates");

        let (tx, feed) = watch::channel(Vec::new());
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        if let Ok(unsubscribe) = serde_json::to_string(&FeedCommand::Unsubscribe) {
                            let _ = sink.send(Message::Text(unsubscribe.into())).await;
                        }
                        let _ = sink.close().await;
                        break;
                    }
                    msg = source.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            match decode_orders(text.as_str()) {
                                Ok(orders) => {
                                    tracing::debug!(count = orders.len(), "Order update received");
                                    if tx.send(orders).is_err() {
                                        break;
                                    }
                                }
                                Err(e) => tracing::warn!(error = %e, "Skipping unparsable order update"),
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::warn!("Order feed closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Order feed error");
                            break;
                        }
                    }
                }
            }
        });

        Ok(Self {
            feed,
            shutdown: Some(shutdown),
            task,
        })
    }

    /// A new receiver for the latest order list.
    pub fn feed(&self) -> OrderFeed {
        self.feed.clone()
    }

    /// Send the unsubscribe command, close the socket and wait for the reader.
    pub async fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!(error = %e, "Order feed task ended abnormally");
        }
        tracing::info!("Unsubscribed from order updates");
    }
}

/// Decode one feed frame.
///
/// The frame must be a JSON array. Entries that do not decode as an order
/// are dropped so one malformed order cannot hide the others.
fn decode_orders(frame: &str) -> serde_json::Result<Vec<Order>> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(frame)?;
    let orders = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Order>(entry) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed order in update");
                None
            }
        })
        .collect();
    Ok(orders)
}

impl Drop for OrderSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_with_op_tag() {
        let subscribe = serde_json::to_string(&FeedCommand::Subscribe { address: "tb1q" }).unwrap();
        assert_eq!(subscribe, r#"{"op":"subscribe","address":"tb1q"}"#);

        let unsubscribe = serde_json::to_string(&FeedCommand::Unsubscribe).unwrap();
        assert_eq!(unsubscribe, r#"{"op":"unsubscribe"}"#);
    }

    #[test]
    fn malformed_entries_do_not_drop_the_frame() {
        let frame = r#"[
            {"ID": 7, "maker": "tb1q"},
            {
                "ID": 42,
                "maker": "tb1q",
                "status": "filled",
                "secret_hash": "00",
                "nonce": 1,
                "initiator_atomic_swap": {
                    "chain": "bitcoin", "asset": "BTC",
                    "initiator_address": "a", "redeemer_address": "b",
                    "amount": 1000, "timelock": 144, "status": "not_started"
                },
                "follower_atomic_swap": {
                    "chain": "evm", "asset": "WBTC",
                    "initiator_address": "c", "redeemer_address": "d",
                    "amount": 997, "timelock": 7200, "status": "refund_pending"
                }
            }
        ]"#;

        let orders = decode_orders(frame).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, 42);
    }

    #[test]
    fn non_array_frame_is_rejected() {
        assert!(decode_orders("garbage").is_err());
        assert!(decode_orders(r#"{"ID": 1}"#).is_err());
    }

    #[tokio::test]
    async fn connect_fails_without_server() {
        let result = OrderSubscription::connect("ws://127.0.0.1:1/ws", "key", "tb1q").await;
        assert!(matches!(result, Err(OrderbookError::WebSocket(_))));
    }
}
