//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ~/.swapctl/settings.toml (optional)
//!     → loader.rs (parse & deserialize, defaults when absent)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!
//! ~/.swapctl/config.json
//!     → loader.rs (ConfigStore::load, empty when absent)
//!     → command handler mutates a field
//!     → ConfigStore::persist (whole file rewritten)
//! ```
//!
//! # Design Decisions
//! - The wallet config is an explicit handle, never global state
//! - All settings fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod paths;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, ConfigStore};
pub use paths::ConfigPaths;
pub use schema::{BitcoinConfig, DotConfig, EvmConfig, OrderbookConfig, Settings, SwapConfig};
