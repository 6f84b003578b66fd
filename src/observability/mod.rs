//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (EnvFilter + fmt layer on stderr)
//! ```

pub mod logging;

pub use logging::{init_tracing, LogHandle, DEFAULT_LOG_LEVEL};
