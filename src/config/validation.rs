//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that endpoints parse as URLs with the expected schemes
//! - Check that contract addresses parse
//! - Validate value ranges (timeouts and intervals > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;

use crate::config::schema::Settings;

/// A single semantic problem in the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate settings, collecting every error.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "evm.rpc_url", &settings.evm.rpc_url, &["http", "https"]);
    for url in &settings.evm.failover_urls {
        check_url(&mut errors, "evm.failover_urls", url, &["http", "https"]);
    }
    if settings.evm.chain_id == 0 {
        errors.push(ValidationError::new("evm.chain_id", "must be non-zero"));
    }
    if settings.evm.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("evm.rpc_timeout_secs", "must be greater than 0"));
    }
    check_address(&mut errors, "evm.atomic_swap_address", &settings.evm.atomic_swap_address);
    check_address(&mut errors, "evm.wbtc_address", &settings.evm.wbtc_address);

    if bitcoin::Network::from_str(&settings.bitcoin.network).is_err() {
        errors.push(ValidationError::new(
            "bitcoin.network",
            format!("unknown network '{}'", settings.bitcoin.network),
        ));
    }
    check_url(&mut errors, "bitcoin.esplora_url", &settings.bitcoin.esplora_url, &["http", "https"]);
    if settings.bitcoin.fee_rate_sat_vb == 0 {
        errors.push(ValidationError::new("bitcoin.fee_rate_sat_vb", "must be greater than 0"));
    }
    if settings.bitcoin.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "bitcoin.request_timeout_secs",
            "must be greater than 0",
        ));
    }

    check_url(&mut errors, "orderbook.url", &settings.orderbook.url, &["http", "https"]);
    check_url(&mut errors, "orderbook.ws_url", &settings.orderbook.ws_url, &["ws", "wss"]);
    if settings.orderbook.fee_bps >= 10_000 {
        errors.push(ValidationError::new("orderbook.fee_bps", "must be below 10000"));
    }
    if settings.orderbook.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "orderbook.request_timeout_secs",
            "must be greater than 0",
        ));
    }

    if settings.swap.poll_interval_ms == 0 {
        errors.push(ValidationError::new("swap.poll_interval_ms", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str, schemes: &[&str]) {
    match url::Url::parse(value) {
        Ok(url) if schemes.contains(&url.scheme()) => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}' in '{}'", url.scheme(), value),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e))),
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if let Err(e) = Address::from_str(value) {
        errors.push(ValidationError::new(field, format!("invalid address '{}': {}", value, e)));
    }
}
