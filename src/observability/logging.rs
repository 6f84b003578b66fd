//! Structured logging.
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Logs go to stderr; stdout carries the command's own output
//! - The subscriber is installed before settings are read, then the
//!   configured level is applied through a reload handle

use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Level used until settings are loaded.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(log_level: &str) -> String {
    format!("swapctl={}", log_level)
}

/// Handle for changing the level after the subscriber is installed.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Switch to `log_level` unless `RUST_LOG` set the filter.
    pub fn set_level(&self, log_level: &str) {
        if self.from_env {
            return;
        }
        if let Err(e) = self.filter.reload(EnvFilter::new(default_filter(log_level))) {
            tracing::warn!(error = %e, "Failed to apply log level");
        }
    }

    /// Current filter directives.
    pub fn current_filter(&self) -> Option<String> {
        self.filter.with_current(|filter| filter.to_string()).ok()
    }
}

/// Install the global subscriber. Later calls leave the first one in place.
pub fn init_tracing(log_level: &str) -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(default_filter(log_level)), false),
    };
    let (filter_layer, filter) = reload::Layer::new(filter);

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    LogHandle { filter, from_env }
}
