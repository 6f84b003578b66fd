//! EVM integration subsystem.
//!
//! # Data Flow
//! ```text
//! config.json (evmPrivateKey) + settings.toml ([evm])
//!     → wallet.rs (key loading, message signing)
//!     → client.rs (read-only RPC with timeouts and failover)
//!     → htlc.rs (approve, initiate, redeem on the AtomicSwap contract)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - Read RPC calls have configurable timeouts

pub mod client;
pub mod htlc;
pub mod types;
pub mod wallet;

pub use client::EvmClient;
pub use htlc::EvmHtlc;
pub use types::{ChainId, EvmError, EvmResult};
pub use wallet::EvmWallet;
