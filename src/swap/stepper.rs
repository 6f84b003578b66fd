//! One-step advancement of an order on chain.
//!
//! A stepper is bound to a snapshot of an order. `next()` classifies the
//! snapshot and submits the single transaction the user owes for it:
//! funding the initiator HTLC or redeeming the follower HTLC.

use alloy::primitives::U256;
use async_trait::async_trait;
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::Network;
use std::sync::Arc;

use crate::btc::htlc::{self, HtlcParams};
use crate::btc::{BitcoinWallet, EsploraClient};
use crate::evm::htlc::{parse_address, parse_b256};
use crate::evm::{EvmHtlc, EvmWallet};
use crate::orderbook::{parse_status, Action, AtomicSwap, Chain, Order, Secret};
use crate::swap::{SwapError, SwapResult};

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Action the step was taken for.
    pub action: Action,
    /// Transaction hash or txid, when a transaction was submitted.
    pub tx: Option<String>,
}

/// Advances an order by exactly one step.
#[async_trait]
pub trait SwapStep: Send {
    async fn next(&mut self) -> SwapResult<StepOutcome>;
}

/// Wallets and chain clients a stepper signs and broadcasts with.
#[derive(Debug)]
pub struct SwapContext {
    pub evm_wallet: EvmWallet,
    pub evm_htlc: EvmHtlc,
    pub btc_wallet: BitcoinWallet,
    pub esplora: EsploraClient,
    /// Used when Esplora has no fee estimate.
    pub fallback_fee_rate: u64,
}

/// Stepper submitting HTLC transactions on Bitcoin and the EVM chain.
#[derive(Debug)]
pub struct HtlcStepper {
    ctx: Arc<SwapContext>,
    order: Order,
}

impl HtlcStepper {
    pub fn new(ctx: Arc<SwapContext>, order: Order) -> Self {
        Self { ctx, order }
    }

    async fn initiate(&self) -> SwapResult<String> {
        let leg = &self.order.initiator_atomic_swap;
        match leg.chain {
            Chain::Bitcoin => self.initiate_bitcoin(leg).await,
            Chain::Evm => {
                let tx_hash = self
                    .ctx
                    .evm_htlc
                    .initiate(
                        parse_address(&leg.redeemer_address)?,
                        leg.timelock,
                        U256::from(leg.amount),
                        parse_b256(&self.order.secret_hash)?,
                    )
                    .await?;
                Ok(tx_hash.to_string())
            }
        }
    }

    async fn initiate_bitcoin(&self, leg: &AtomicSwap) -> SwapResult<String> {
        let wallet = &self.ctx.btc_wallet;
        let htlc_address = self.htlc_params(leg, wallet.network())?.address(wallet.network());

        let utxos = self.ctx.esplora.get_utxos(&wallet.address().to_string()).await?;
        let fee_rate = self.fee_rate().await?;
        let tx = htlc::build_funding_tx(wallet, &utxos, &htlc_address, leg.amount, fee_rate)?;

        let txid = self.ctx.esplora.broadcast(&serialize_hex(&tx)).await?;
        tracing::info!(
            order_id = self.order.id,
            htlc = %htlc_address,
            amount = leg.amount,
            txid = %txid,
            "Funded bitcoin HTLC"
        );
        Ok(txid)
    }

    async fn redeem(&self) -> SwapResult<String> {
        let secret = Secret::derive(&self.ctx.evm_wallet, self.order.nonce).await?;
        let expected = self.order.secret_hash.trim_start_matches("0x").to_ascii_lowercase();
        if secret.hash_hex() != expected {
            return Err(self.invalid("secret hash does not match the derived secret"));
        }

        let leg = &self.order.follower_atomic_swap;
        match leg.chain {
            Chain::Evm => {
                let swap_id = leg
                    .swap_id
                    .as_deref()
                    .ok_or_else(|| self.invalid("follower swap has no swap id"))?;
                let tx_hash = self
                    .ctx
                    .evm_htlc
                    .redeem(parse_b256(swap_id)?, secret.as_bytes())
                    .await?;
                Ok(tx_hash.to_string())
            }
            Chain::Bitcoin => self.redeem_bitcoin(leg, &secret).await,
        }
    }

    async fn redeem_bitcoin(&self, leg: &AtomicSwap, secret: &Secret) -> SwapResult<String> {
        let wallet = &self.ctx.btc_wallet;
        let params = self.htlc_params(leg, wallet.network())?;
        let htlc_address = params.address(wallet.network());

        let utxos = self.ctx.esplora.get_utxos(&htlc_address.to_string()).await?;
        let fee_rate = self.fee_rate().await?;
        let tx = htlc::build_redeem_tx(wallet, &utxos, &params.script(), secret.as_bytes(), fee_rate)?;

        let txid = self.ctx.esplora.broadcast(&serialize_hex(&tx)).await?;
        tracing::info!(
            order_id = self.order.id,
            htlc = %htlc_address,
            inputs = utxos.len(),
            txid = %txid,
            "Redeemed bitcoin HTLC"
        );
        Ok(txid)
    }

    fn htlc_params(&self, leg: &AtomicSwap, network: Network) -> SwapResult<HtlcParams> {
        let secret_hash: [u8; 32] = hex::decode(self.order.secret_hash.trim_start_matches("0x"))
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| self.invalid("secret hash is not 32 hex bytes"))?;
        let timelock =
            u32::try_from(leg.timelock).map_err(|_| self.invalid("timelock out of range"))?;

        Ok(HtlcParams {
            secret_hash,
            redeemer_pkh: htlc::pubkey_hash_from_address(&leg.redeemer_address, network)?,
            initiator_pkh: htlc::pubkey_hash_from_address(&leg.initiator_address, network)?,
            timelock,
        })
    }

    async fn fee_rate(&self) -> SwapResult<u64> {
        Ok(self
            .ctx
            .esplora
            .get_fee_rate()
            .await?
            .unwrap_or(self.ctx.fallback_fee_rate))
    }

    fn invalid(&self, reason: &str) -> SwapError {
        SwapError::InvalidOrder {
            order_id: self.order.id,
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl SwapStep for HtlcStepper {
    async fn next(&mut self) -> SwapResult<StepOutcome> {
        let action = parse_status(&self.order);
        let tx = match action {
            Action::UserCanInitiate => Some(self.initiate().await?),
            Action::UserCanRedeem => Some(self.redeem().await?),
            _ => None,
        };
        Ok(StepOutcome { action, tx })
    }
}
