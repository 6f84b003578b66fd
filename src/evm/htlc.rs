//! AtomicSwap HTLC contract bindings and transaction submission.
//!
//! # Responsibilities
//! - Approve the swap contract to pull WBTC
//! - Initiate a swap (lock WBTC behind a secret hash and timelock)
//! - Redeem a swap by revealing the secret

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;

use crate::evm::types::{EvmConfig, EvmError, EvmResult};
use crate::evm::wallet::EvmWallet;

sol! {
    /// HTLC contract holding ERC-20 funds for cross-chain swaps.
    #[sol(rpc)]
    #[derive(Debug)]
    contract AtomicSwap {
        function initiate(address redeemer, uint256 timelock, uint256 amount, bytes32 secretHash) external;
        function redeem(bytes32 orderId, bytes calldata secret) external;
    }

    /// Minimal ERC-20 surface.
    #[sol(rpc)]
    #[derive(Debug)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// Signing handle to the AtomicSwap contract and its token.
#[derive(Clone)]
pub struct EvmHtlc {
    provider: DynProvider,
    owner: Address,
    swap_contract: Address,
    token: Address,
}

impl EvmHtlc {
    /// Build a signing provider for `wallet` against the configured RPC.
    pub fn connect(config: &EvmConfig, wallet: &EvmWallet) -> EvmResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            EvmError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            owner: wallet.address(),
            swap_contract: parse_address(&config.atomic_swap_address)?,
            token: parse_address(&config.wbtc_address)?,
        })
    }

    /// Lock `amount` of the token for `redeemer`.
    ///
    /// Approves the swap contract first when the current allowance is short.
    pub async fn initiate(
        &self,
        redeemer: Address,
        timelock: u64,
        amount: U256,
        secret_hash: B256,
    ) -> EvmResult<TxHash> {
        self.ensure_allowance(amount).await?;

        let contract = AtomicSwap::new(self.swap_contract, self.provider.clone());
        let pending = contract
            .initiate(redeemer, U256::from(timelock), amount, secret_hash)
            .send()
            .await
            .map_err(|e| EvmError::Contract(format!("initiate failed: {}", e)))?;

        let tx_hash = self.confirm(pending, "initiate").await?;
        tracing::info!(tx_hash = %tx_hash, redeemer = %redeemer, amount = %amount, "Swap initiated on EVM");
        Ok(tx_hash)
    }

    /// Claim the swap identified by `swap_id` by revealing `secret`.
    pub async fn redeem(&self, swap_id: B256, secret: &[u8]) -> EvmResult<TxHash> {
        let contract = AtomicSwap::new(self.swap_contract, self.provider.clone());
        let pending = contract
            .redeem(swap_id, Bytes::copy_from_slice(secret))
            .send()
            .await
            .map_err(|e| EvmError::Contract(format!("redeem failed: {}", e)))?;

        let tx_hash = self.confirm(pending, "redeem").await?;
        tracing::info!(tx_hash = %tx_hash, swap_id = %swap_id, "Swap redeemed on EVM");
        Ok(tx_hash)
    }

    async fn ensure_allowance(&self, amount: U256) -> EvmResult<()> {
        let token = IERC20::new(self.token, self.provider.clone());
        let allowance = token
            .allowance(self.owner, self.swap_contract)
            .call()
            .await
            .map_err(|e| EvmError::Contract(format!("allowance query failed: {}", e)))?;

        if allowance >= amount {
            return Ok(());
        }

        tracing::debug!(allowance = %allowance, required = %amount, "Approving swap contract");
        let pending = token
            .approve(self.swap_contract, amount)
            .send()
            .await
            .map_err(|e| EvmError::Contract(format!("approve failed: {}", e)))?;
        self.confirm(pending, "approve").await?;
        Ok(())
    }

    async fn confirm(
        &self,
        pending: alloy::providers::PendingTransactionBuilder<alloy::network::Ethereum>,
        what: &str,
    ) -> EvmResult<TxHash> {
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| EvmError::Rpc(format!("{} receipt unavailable: {}", what, e)))?;

        if !receipt.status() {
            return Err(EvmError::Reverted(format!(
                "{} transaction {}",
                what, receipt.transaction_hash
            )));
        }
        Ok(receipt.transaction_hash)
    }
}

impl std::fmt::Debug for EvmHtlc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmHtlc")
            .field("owner", &self.owner)
            .field("swap_contract", &self.swap_contract)
            .field("token", &self.token)
            .finish()
    }
}

/// Parse a checksummed or lowercase hex address.
pub fn parse_address(value: &str) -> EvmResult<Address> {
    value
        .parse()
        .map_err(|e| EvmError::InvalidInput(format!("invalid address '{}': {}", value, e)))
}

/// Parse a 32-byte hex value, with or without 0x prefix.
pub fn parse_b256(value: &str) -> EvmResult<B256> {
    value
        .parse()
        .map_err(|e| EvmError::InvalidInput(format!("invalid bytes32 '{}': {}", value, e)))
}
