//! Bitcoin wallet, Esplora access and HTLC transactions.
//!
//! # Data Flow
//! ```text
//! config.json (bitcoinPrivateKey) + settings.toml ([bitcoin])
//!     → wallet.rs (key parsing, P2WPKH address, input signing)
//!     → esplora.rs (UTXOs, balance, fee estimates, broadcast)
//!     → htlc.rs (P2WSH HTLC script, funding and redeem transactions)
//! ```

use thiserror::Error;

pub mod esplora;
pub mod htlc;
pub mod wallet;

pub use esplora::EsploraClient;
pub use wallet::BitcoinWallet;

/// Errors that can occur in bitcoin operations.
#[derive(Debug, Error)]
pub enum BitcoinError {
    /// Malformed or unsupported private key.
    #[error("key error: {0}")]
    Key(String),

    /// Malformed address or address for another network.
    #[error("address error: {0}")]
    Address(String),

    /// Error in transaction construction.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Wallet cannot cover amount plus fee.
    #[error("insufficient funds: need {needed} sats, have {available} sats")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Error communicating with Esplora.
    #[error("esplora error: {0}")]
    Esplora(String),

    /// Error computing sighash.
    #[error("sighash error: {0}")]
    Sighash(String),

    /// Unknown network name.
    #[error("unknown bitcoin network '{0}'")]
    Network(String),
}

/// Result type for bitcoin operations.
pub type Result<T> = std::result::Result<T, BitcoinError>;

/// Parse a network name: bitcoin, testnet, signet or regtest.
pub fn parse_network(name: &str) -> Result<bitcoin::Network> {
    name.parse().map_err(|_| BitcoinError::Network(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_esplora() {
        let err = BitcoinError::Esplora("connection refused".to_string());
        assert_eq!(err.to_string(), "esplora error: connection refused");
    }

    #[test]
    fn error_display_insufficient_funds() {
        let err = BitcoinError::InsufficientFunds {
            needed: 10_000,
            available: 500,
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds: need 10000 sats, have 500 sats"
        );
    }

    #[test]
    fn parses_network_names() {
        assert_eq!(parse_network("regtest").unwrap(), bitcoin::Network::Regtest);
        assert_eq!(parse_network("testnet").unwrap(), bitcoin::Network::Testnet);
        assert!(matches!(parse_network("moonnet"), Err(BitcoinError::Network(_))));
    }
}
