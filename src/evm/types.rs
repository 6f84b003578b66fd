//! Chain-specific types and error definitions.

use thiserror::Error;

pub use crate::config::schema::EvmConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during EVM operations.
#[derive(Debug, Error)]
pub enum EvmError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Contract call or transaction submission failed.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Malformed address or hash in settings or order data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for EVM operations.
pub type EvmResult<T> = Result<T, EvmError>;
