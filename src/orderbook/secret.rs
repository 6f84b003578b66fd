//! Swap secrets.
//!
//! The secret is derived from an EVM wallet signature over a per-order
//! nonce, so it can be rebuilt from the order record when redeeming.
//! ECDSA signing is deterministic (RFC 6979).

use bitcoin::hashes::{sha256, Hash};
use rand::Rng;

use crate::evm::{EvmResult, EvmWallet};

/// Preimage of an order's secret hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; 32]);

impl Secret {
    /// Derive the secret for `nonce`.
    pub async fn derive(wallet: &EvmWallet, nonce: u64) -> EvmResult<Self> {
        let message = format!("swapctl.secret:{}", nonce);
        let signature = wallet.sign_message(message.as_bytes()).await?;
        Ok(Self(sha256::Hash::hash(&signature.as_bytes()).to_byte_array()))
    }

    /// Raw 32 bytes revealed on redeem.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// SHA256 of the secret.
    pub fn hash(&self) -> [u8; 32] {
        sha256::Hash::hash(&self.0).to_byte_array()
    }

    /// SHA256 of the secret, hex-encoded.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret").field("hash", &self.hash_hex()).finish()
    }
}

/// Fresh nonce for a new order.
pub fn random_nonce() -> u64 {
    rand::thread_rng().gen()
}
