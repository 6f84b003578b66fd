//! EVM JSON-RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (primary + failovers)
//! - Query chain state (chain id, native and token balances)
//! - Handle timeouts and network errors by moving to the next provider

use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::evm::htlc::IERC20;
use crate::evm::types::{ChainId, EvmConfig, EvmError, EvmResult};

/// Read-only RPC client wrapper with failover support.
#[derive(Clone)]
pub struct EvmClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: EvmConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl EvmClient {
    /// Create a new client. No network traffic happens here.
    pub fn new(config: EvmConfig) -> EvmResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            EvmError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(ProviderBuilder::new().connect_http(primary_url).erased());

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(ProviderBuilder::new().connect_http(url).erased());
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Run `op` against each provider in turn until one answers.
    async fn with_failover<T, F, Fut>(&self, what: &str, op: F) -> EvmResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, String>>,
    {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, op(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(EvmError::Rpc(format!("All RPC providers failed to {}", what)))
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> EvmResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(EvmError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> EvmResult<ChainId> {
        self.with_failover("get chain id", |provider| async move {
            provider.get_chain_id().await.map_err(|e| e.to_string())
        })
        .await
        .map(ChainId)
    }

    /// Get the native balance of an address in wei.
    pub async fn get_balance(&self, address: Address) -> EvmResult<U256> {
        self.with_failover("get balance", |provider| async move {
            provider.get_balance(address).await.map_err(|e| e.to_string())
        })
        .await
    }

    /// Get the ERC-20 balance of `owner` in the token's base units.
    pub async fn get_token_balance(&self, token: Address, owner: Address) -> EvmResult<U256> {
        self.with_failover("get token balance", |provider| async move {
            IERC20::new(token, provider)
                .balanceOf(owner)
                .call()
                .await
                .map_err(|e| e.to_string())
        })
        .await
    }

    /// Get the configuration.
    pub fn config(&self) -> &EvmConfig {
        &self.config
    }
}

impl std::fmt::Debug for EvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
