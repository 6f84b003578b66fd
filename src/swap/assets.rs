//! Asset pairs and amount handling for the swap commands.

use crate::error::AppError;
use crate::orderbook::Asset;

/// Satoshis per bitcoin.
pub const SATS_PER_BTC: u64 = 100_000_000;

const BTC_DECIMALS: usize = 8;

/// Direction of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapPair {
    pub from: Asset,
    pub to: Asset,
}

impl SwapPair {
    pub const BTC_TO_WBTC: SwapPair = SwapPair {
        from: Asset::Btc,
        to: Asset::Wbtc,
    };

    pub const WBTC_TO_BTC: SwapPair = SwapPair {
        from: Asset::Wbtc,
        to: Asset::Btc,
    };
}

impl std::fmt::Display for SwapPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Resolve the `--from`/`--to` arguments of `rebalance`.
pub fn resolve_pair(from: &str, to: &str) -> Result<SwapPair, AppError> {
    match (
        from.trim().to_ascii_uppercase().as_str(),
        to.trim().to_ascii_uppercase().as_str(),
    ) {
        ("BTC", "WBTC") => Ok(SwapPair::BTC_TO_WBTC),
        ("WBTC", "BTC") => Ok(SwapPair::WBTC_TO_BTC),
        _ => Err(AppError::InvalidAssetPair {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Parse a decimal BTC amount ("0.001") into satoshis.
pub fn parse_btc_amount(value: &str) -> Result<u64, AppError> {
    let invalid = |reason: &str| AppError::InvalidAmount(format!("'{}': {}", value, reason));

    let trimmed = value.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("empty amount"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected a decimal number"));
    }
    if fraction.len() > BTC_DECIMALS {
        return Err(invalid("more than 8 decimal places"));
    }

    let whole_sats = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(SATS_PER_BTC))
            .ok_or_else(|| invalid("too large"))?
    };
    let fraction_sats = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = BTC_DECIMALS)
            .parse::<u64>()
            .map_err(|_| invalid("expected a decimal number"))?
    };

    let sats = whole_sats
        .checked_add(fraction_sats)
        .ok_or_else(|| invalid("too large"))?;
    if sats == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(sats)
}

/// Amount expected on the destination chain after the orchestrator fee.
pub fn receive_amount(send_amount: u64, fee_bps: u64) -> u64 {
    let fee = (u128::from(send_amount) * u128::from(fee_bps) / 10_000) as u64;
    send_amount.saturating_sub(fee)
}

/// Format satoshis as a decimal BTC string.
pub fn format_sats(sats: u64) -> String {
    format!("{}.{:08}", sats / SATS_PER_BTC, sats % SATS_PER_BTC)
}
