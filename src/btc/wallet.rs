//! Bitcoin wallet: key parsing, native segwit address, input signing.

use bitcoin::ecdsa;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{All, Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SegwitV0Sighash, SighashCache};
use bitcoin::{Address, CompressedPublicKey, Network, NetworkKind, PrivateKey, Transaction, TxOut, Witness};

use crate::btc::{BitcoinError, Result};

/// Single-key P2WPKH wallet.
#[derive(Clone)]
pub struct BitcoinWallet {
    secp: Secp256k1<All>,
    private_key: PrivateKey,
    public_key: CompressedPublicKey,
    address: Address,
    network: Network,
}

impl BitcoinWallet {
    /// Create a wallet from a WIF string or a 64-character hex key.
    ///
    /// A WIF key must belong to the same network kind as `network`.
    pub fn from_private_key(key: &str, network: Network) -> Result<Self> {
        let key = key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let private_key = if key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit()) {
            let bytes = hex::decode(key).map_err(|e| BitcoinError::Key(e.to_string()))?;
            PrivateKey::from_slice(&bytes, network)
                .map_err(|e| BitcoinError::Key(format!("invalid secret key: {e}")))?
        } else {
            let wif = PrivateKey::from_wif(key)
                .map_err(|e| BitcoinError::Key(format!("invalid WIF: {e}")))?;
            if wif.network != NetworkKind::from(network) {
                return Err(BitcoinError::Key(format!(
                    "WIF key is not for network {network}"
                )));
            }
            wif
        };

        let secp = Secp256k1::new();
        let public_key = CompressedPublicKey::from_private_key(&secp, &private_key)
            .map_err(|_| BitcoinError::Key("uncompressed keys are not supported".to_string()))?;
        let address = Address::p2wpkh(&public_key, network);

        tracing::debug!(address = %address, network = %network, "Bitcoin wallet initialized");

        Ok(Self {
            secp,
            private_key,
            public_key,
            address,
            network,
        })
    }

    /// Native segwit receive address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Network this wallet derives addresses for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Compressed public key.
    pub fn public_key(&self) -> &CompressedPublicKey {
        &self.public_key
    }

    /// HASH160 of the public key, as embedded in P2WPKH and HTLC scripts.
    pub fn pubkey_hash(&self) -> [u8; 20] {
        self.public_key.pubkey_hash().to_byte_array()
    }

    /// Sign a segwit v0 sighash with SIGHASH_ALL.
    pub fn sign_segwit_v0(&self, sighash: SegwitV0Sighash) -> ecdsa::Signature {
        let msg = Message::from_digest(sighash.to_byte_array());
        ecdsa::Signature {
            signature: self.secp.sign_ecdsa(&msg, &self.private_key.inner),
            sighash_type: EcdsaSighashType::All,
        }
    }

    /// Sign every input of `tx`, each spending the matching wallet output in `prevouts`.
    pub fn sign_p2wpkh_inputs(&self, tx: &mut Transaction, prevouts: &[TxOut]) -> Result<()> {
        if tx.input.len() != prevouts.len() {
            return Err(BitcoinError::Transaction(format!(
                "{} inputs but {} prevouts",
                tx.input.len(),
                prevouts.len()
            )));
        }

        let mut cache = SighashCache::new(tx);
        for (index, prevout) in prevouts.iter().enumerate() {
            let sighash = cache
                .p2wpkh_signature_hash(
                    index,
                    &prevout.script_pubkey,
                    prevout.value,
                    EcdsaSighashType::All,
                )
                .map_err(|e| BitcoinError::Sighash(e.to_string()))?;
            let signature = self.sign_segwit_v0(sighash);

            let witness = cache
                .witness_mut(index)
                .ok_or_else(|| BitcoinError::Sighash(format!("no input at index {index}")))?;
            *witness = Witness::p2wpkh(&signature, &self.public_key.0);
        }
        Ok(())
    }
}

impl std::fmt::Debug for BitcoinWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitcoinWallet")
            .field("address", &self.address)
            .field("network", &self.network)
            .finish()
    }
}
