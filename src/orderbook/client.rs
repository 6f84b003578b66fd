//! REST client for the orderbook.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::orderbook::types::{CreateOrderRequest, CreateOrderResponse, OrderId};
use crate::orderbook::{OrderbookError, OrderbookResult};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Orderbook REST client.
#[derive(Debug, Clone)]
pub struct OrderbookClient {
    client: Client,
    base_url: String,
}

impl OrderbookClient {
    /// Create a client that authenticates with `api_key`.
    pub fn new(base_url: &str, api_key: &str, request_timeout: Duration) -> OrderbookResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key)
                .map_err(|_| OrderbookError::InvalidApiKey)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit a new order and return its id.
    pub async fn create_order(&self, request: &CreateOrderRequest) -> OrderbookResult<OrderId> {
        let resp = self
            .client
            .post(format!("{}/orders", self.base_url))
            .json(request)
            .send()
            .await?;

        let created: CreateOrderResponse = parse_response(resp).await?;
        tracing::info!(
            order_id = created.order_id,
            from = %request.from_asset,
            to = %request.to_asset,
            send_amount = request.send_amount,
            "Order created"
        );
        Ok(created.order_id)
    }
}

async fn parse_response<T: DeserializeOwned>(resp: Response) -> OrderbookResult<T> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(OrderbookError::Api {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
