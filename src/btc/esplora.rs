//! Esplora REST client.
//!
//! Queries UTXOs and balances, fetches fee estimates and broadcasts
//! transactions.

use bitcoin::{Amount, OutPoint, Txid};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::btc::{BitcoinError, Result};

/// Confirmation target used for fee estimates, in blocks.
const FEE_TARGET_BLOCKS: &str = "6";

/// Esplora REST API client.
#[derive(Debug, Clone)]
pub struct EsploraClient {
    client: reqwest::Client,
    base_url: String,
}

/// Transaction confirmation status.
#[derive(Debug, Clone, Deserialize)]
pub struct TxStatus {
    /// Whether the transaction is confirmed in a block.
    pub confirmed: bool,
    /// Block height if confirmed.
    pub block_height: Option<u64>,
}

/// Unspent transaction output.
#[derive(Debug, Clone, Deserialize)]
pub struct Utxo {
    /// Transaction ID.
    pub txid: String,
    /// Output index.
    pub vout: u32,
    /// Value in satoshis.
    pub value: u64,
    /// Confirmation status.
    pub status: TxStatus,
}

impl Utxo {
    /// Outpoint spending this output.
    pub fn outpoint(&self) -> Result<OutPoint> {
        let txid = Txid::from_str(&self.txid)
            .map_err(|e| BitcoinError::Esplora(format!("invalid txid {}: {e}", self.txid)))?;
        Ok(OutPoint::new(txid, self.vout))
    }

    /// Output value.
    pub fn amount(&self) -> Amount {
        Amount::from_sat(self.value)
    }
}

impl EsploraClient {
    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    /// Returns `BitcoinError::Esplora` if the HTTP client cannot be built.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BitcoinError::Esplora(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Broadcasts a raw transaction to the network.
    ///
    /// # Arguments
    /// * `tx_hex` - Hex-encoded raw transaction
    ///
    /// # Returns
    /// The transaction ID on success.
    ///
    /// # Errors
    /// Returns `BitcoinError::Esplora` if broadcast fails.
    pub async fn broadcast(&self, tx_hex: &str) -> Result<String> {
        let url = format!("{}/tx", self.base_url);
        let response = self
            .client
            .post(&url)
            .body(tx_hex.to_string())
            .send()
            .await
            .map_err(|e| BitcoinError::Esplora(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BitcoinError::Esplora(format!(
                "broadcast failed: {error_text}"
            )));
        }

        response
            .text()
            .await
            .map(|txid| txid.trim().to_string())
            .map_err(|e| BitcoinError::Esplora(e.to_string()))
    }

    /// Gets all UTXOs for an address.
    ///
    /// # Errors
    /// Returns `BitcoinError::Esplora` if query fails.
    pub async fn get_utxos(&self, address: &str) -> Result<Vec<Utxo>> {
        let url = format!("{}/address/{address}/utxo", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BitcoinError::Esplora(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BitcoinError::Esplora(format!(
                "failed to get utxos: {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BitcoinError::Esplora(e.to_string()))
    }

    /// Gets the total balance (sum of UTXO values) for an address.
    ///
    /// Unconfirmed outputs are included.
    ///
    /// # Errors
    /// Returns `BitcoinError::Esplora` if query fails.
    pub async fn get_balance(&self, address: &str) -> Result<u64> {
        let utxos = self.get_utxos(address).await?;
        Ok(utxos.iter().map(|u| u.value).sum())
    }

    /// Fee rate in sat/vB for confirmation within a few blocks.
    ///
    /// Returns `None` when the server has no estimate for the target
    /// (regtest typically returns an empty map).
    ///
    /// # Errors
    /// Returns `BitcoinError::Esplora` if query fails.
    pub async fn get_fee_rate(&self) -> Result<Option<u64>> {
        let url = format!("{}/fee-estimates", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BitcoinError::Esplora(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BitcoinError::Esplora(format!(
                "failed to get fee estimates: {status}"
            )));
        }

        let estimates: HashMap<String, f64> = response
            .json()
            .await
            .map_err(|e| BitcoinError::Esplora(e.to_string()))?;

        Ok(fee_rate_for_target(&estimates))
    }
}

fn fee_rate_for_target(estimates: &HashMap<String, f64>) -> Option<u64> {
    estimates
        .get(FEE_TARGET_BLOCKS)
        .filter(|rate| rate.is_finite() && **rate > 0.0)
        .map(|rate| rate.ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new_trims_trailing_slash() {
        let client = EsploraClient::new("http://example.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://example.com");
    }

    #[test]
    fn utxo_deserializes() {
        let json = r#"{
            "txid": "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b",
            "vout": 0,
            "value": 100000,
            "status": {"confirmed": true, "block_height": 50}
        }"#;
        let utxo: Utxo = serde_json::from_str(json).unwrap();
        assert_eq!(utxo.vout, 0);
        assert_eq!(utxo.amount(), Amount::from_sat(100_000));
        assert!(utxo.status.confirmed);
        assert_eq!(utxo.outpoint().unwrap().vout, 0);
    }

    #[test]
    fn utxo_with_bad_txid_has_no_outpoint() {
        let utxo = Utxo {
            txid: "abc123".into(),
            vout: 1,
            value: 1,
            status: TxStatus {
                confirmed: false,
                block_height: None,
            },
        };
        assert!(utxo.outpoint().is_err());
    }

    #[test]
    fn fee_rate_rounds_up() {
        let estimates: HashMap<String, f64> =
            serde_json::from_str(r#"{"1": 20.5, "6": 3.2, "144": 1.0}"#).unwrap();
        assert_eq!(fee_rate_for_target(&estimates), Some(4));
    }

    #[test]
    fn fee_rate_missing_target() {
        let estimates: HashMap<String, f64> = HashMap::new();
        assert_eq!(fee_rate_for_target(&estimates), None);
    }
}
