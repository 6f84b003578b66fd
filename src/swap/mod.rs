//! Swap orchestration and the polling loop that drives a swap.
//!
//! # Data Flow
//! ```text
//! command → assets.rs (pair + amounts) → Orchestrator::swap → OrderId
//!         → poller.rs (feed snapshots → parse_status → ActionTracker)
//!         → Orchestrator::get_swap → stepper.rs (one on-chain step)
//! ```

use thiserror::Error;

use crate::btc::BitcoinError;
use crate::evm::EvmError;
use crate::orderbook::OrderbookError;

pub mod assets;
pub mod orchestrator;
pub mod poller;
pub mod stepper;

pub use assets::{parse_btc_amount, receive_amount, resolve_pair, SwapPair};
pub use orchestrator::{Orchestrator, OrderbookOrchestrator, SwapRequest};
pub use poller::{ActionTracker, SwapPoller, Transition};
pub use stepper::{HtlcStepper, StepOutcome, SwapContext, SwapStep};

/// Errors raised while starting or advancing a swap.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error(transparent)]
    Evm(#[from] EvmError),

    #[error(transparent)]
    Bitcoin(#[from] BitcoinError),

    #[error(transparent)]
    Orderbook(#[from] OrderbookError),

    /// The order carries data this client cannot act on.
    #[error("invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: u64, reason: String },
}

/// Result type for swap operations.
pub type SwapResult<T> = Result<T, SwapError>;
