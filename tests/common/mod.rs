//! Shared utilities for integration tests.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;

use swapctl::orderbook::{
    parse_status, Action, Asset, AtomicSwap, Chain, Order, OrderFeed, OrderId, OrderStatus,
    SwapStatus,
};
use swapctl::swap::{Orchestrator, StepOutcome, SwapError, SwapRequest, SwapResult, SwapStep};

/// A request as seen by the mock orderbook.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header lines with lowercased names.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Start a programmable mock HTTP backend on an ephemeral port.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

#[allow(dead_code)]
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
    })
}

/// Start a mock order feed that accepts one WebSocket client.
///
/// Every text frame the client sends is forwarded on the returned channel.
/// `frames` are pushed after the first client message.
#[allow(dead_code)]
pub async fn start_order_feed(frames: Vec<String>) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let Ok((socket, _)) = listener.accept().await else {
            return;
        };
        let Ok(mut ws) = tokio_tungstenite::accept_async(socket).await else {
            return;
        };

        let mut pushed = false;
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                let _ = tx.send(text.as_str().to_string());
                if !pushed {
                    pushed = true;
                    for frame in &frames {
                        if ws.send(Message::Text(frame.clone().into())).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }
    });

    (addr, rx)
}

/// One HTLC leg in `status`.
#[allow(dead_code)]
pub fn leg(chain: Chain, asset: Asset, status: SwapStatus) -> AtomicSwap {
    AtomicSwap {
        chain,
        asset,
        initiator_address: "initiator".into(),
        redeemer_address: "redeemer".into(),
        amount: 100_000,
        timelock: 144,
        swap_id: None,
        initiate_tx_hash: None,
        redeem_tx_hash: None,
        status,
    }
}

/// A BTC → WBTC order with the given statuses.
#[allow(dead_code)]
pub fn order(id: OrderId, status: OrderStatus, initiator: SwapStatus, follower: SwapStatus) -> Order {
    Order {
        id,
        maker: "bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080".into(),
        status,
        secret_hash: "00".repeat(32),
        nonce: 1,
        initiator_atomic_swap: leg(Chain::Bitcoin, Asset::Btc, initiator),
        follower_atomic_swap: leg(Chain::Evm, Asset::Wbtc, follower),
    }
}

/// An order snapshot classifying as `action`.
#[allow(dead_code)]
pub fn order_in(id: OrderId, action: Action) -> Order {
    use SwapStatus::*;
    let (status, initiator, follower) = match action {
        Action::UserCanInitiate => (OrderStatus::Filled, NotStarted, NotStarted),
        Action::CounterpartyCanInitiate => (OrderStatus::Filled, Initiated, NotStarted),
        Action::UserCanRedeem => (OrderStatus::Filled, Initiated, Initiated),
        Action::CounterpartyCanRedeem => (OrderStatus::Executed, Initiated, Redeemed),
        Action::UserCanRefund => (OrderStatus::Expired, Expired, NotStarted),
        Action::Completed => (OrderStatus::Settled, Redeemed, Redeemed),
        Action::NoAction => (OrderStatus::Filled, InitiateDetected, NotStarted),
    };
    let order = order(id, status, initiator, follower);
    assert_eq!(parse_status(&order), action);
    order
}

/// Orchestrator that replays scripted feed snapshots and records steps.
#[allow(dead_code)]
pub struct ScriptedOrchestrator {
    pub order_id: OrderId,
    snapshots: Vec<Vec<Order>>,
    pace: Duration,
    fail_steps: bool,
    pub stepped: Arc<Mutex<Vec<Action>>>,
    pub requests: Mutex<Vec<SwapRequest>>,
    pub unsubscribed: AtomicBool,
}

#[allow(dead_code)]
impl ScriptedOrchestrator {
    /// Snapshots are published `pace` apart; the feed closes after the last.
    pub fn new(order_id: OrderId, snapshots: Vec<Vec<Order>>, pace: Duration) -> Self {
        Self {
            order_id,
            snapshots,
            pace,
            fail_steps: false,
            stepped: Arc::new(Mutex::new(Vec::new())),
            requests: Mutex::new(Vec::new()),
            unsubscribed: AtomicBool::new(false),
        }
    }

    /// Every step returns an error.
    pub fn failing(mut self) -> Self {
        self.fail_steps = true;
        self
    }

    pub fn stepped(&self) -> Vec<Action> {
        self.stepped.lock().unwrap().clone()
    }

    pub fn was_unsubscribed(&self) -> bool {
        self.unsubscribed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Orchestrator for ScriptedOrchestrator {
    async fn swap(&self, request: SwapRequest) -> SwapResult<OrderId> {
        self.requests.lock().unwrap().push(request);
        Ok(self.order_id)
    }

    async fn subscribe_orders(&self, _address: &str) -> SwapResult<OrderFeed> {
        let (tx, rx) = watch::channel(Vec::new());
        let snapshots = self.snapshots.clone();
        let pace = self.pace;
        tokio::spawn(async move {
            for snapshot in snapshots {
                tokio::time::sleep(pace).await;
                let _ = tx.send(snapshot);
            }
            tokio::time::sleep(pace).await;
        });
        Ok(rx)
    }

    async fn unsubscribe_orders(&self) -> SwapResult<()> {
        self.unsubscribed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn get_swap(&self, order: &Order) -> Box<dyn SwapStep> {
        Box::new(ScriptedStep {
            order: order.clone(),
            fail: self.fail_steps,
            log: Arc::clone(&self.stepped),
        })
    }
}

struct ScriptedStep {
    order: Order,
    fail: bool,
    log: Arc<Mutex<Vec<Action>>>,
}

#[async_trait]
impl SwapStep for ScriptedStep {
    async fn next(&mut self) -> SwapResult<StepOutcome> {
        let action = parse_status(&self.order);
        if self.fail {
            return Err(SwapError::InvalidOrder {
                order_id: self.order.id,
                reason: "scripted failure".into(),
            });
        }
        let mut log = self.log.lock().unwrap();
        log.push(action);
        Ok(StepOutcome {
            action,
            tx: Some(format!("0x{:064x}", log.len())),
        })
    }
}
