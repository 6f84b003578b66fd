//! Configuration schema definitions.
//!
//! Two documents live in the config directory:
//! - `config.json`: the wallet keys ([`DotConfig`]), written by the CLI
//! - `settings.toml`: network endpoints and tuning ([`Settings`]), written by the user
//!
//! All settings types derive Serde traits and default every field so a
//! missing or partial `settings.toml` still yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Persisted wallet keys.
///
/// Both fields are optional; commands that need a wallet check for it
/// and fail with a missing-wallet error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DotConfig {
    /// Hex-encoded secp256k1 key for the EVM wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evm_private_key: Option<String>,

    /// WIF or hex-encoded key for the Bitcoin wallet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitcoin_private_key: Option<String>,
}

/// Root settings for the CLI.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// EVM chain endpoints and contract addresses.
    pub evm: EvmConfig,

    /// Bitcoin network and Esplora endpoint.
    pub bitcoin: BitcoinConfig,

    /// Swap orchestrator endpoints.
    pub orderbook: OrderbookConfig,

    /// Polling loop tuning.
    pub swap: SwapConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// EVM chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EvmConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 11155111 for Sepolia, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Address of the AtomicSwap HTLC contract.
    pub atomic_swap_address: String,

    /// Address of the WBTC ERC-20 token.
    pub wbtc_address: String,
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            // First two deterministic Anvil deployments.
            atomic_swap_address: "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".to_string(),
            wbtc_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
        }
    }
}

/// Bitcoin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BitcoinConfig {
    /// Network name: bitcoin, testnet, signet or regtest.
    pub network: String,

    /// Esplora REST base URL.
    pub esplora_url: String,

    /// Fallback fee rate when Esplora has no estimate.
    pub fee_rate_sat_vb: u64,

    /// Esplora request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BitcoinConfig {
    fn default() -> Self {
        Self {
            network: "regtest".to_string(),
            esplora_url: "http://localhost:3000".to_string(),
            fee_rate_sat_vb: 2,
            request_timeout_secs: 15,
        }
    }
}

/// Orderbook (swap orchestrator) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrderbookConfig {
    /// REST base URL.
    pub url: String,

    /// WebSocket URL for order subscriptions.
    pub ws_url: String,

    /// Orchestrator fee in basis points, deducted from the receive amount.
    pub fee_bps: u64,

    /// REST request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OrderbookConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4426".to_string(),
            ws_url: "ws://localhost:4426/ws".to_string(),
            fee_bps: 30,
            request_timeout_secs: 15,
        }
    }
}

/// Swap polling loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Upper bound between order samples in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
