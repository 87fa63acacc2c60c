//! Exchange endpoint constants and helpers.

use crate::symbols::Symbol;

/// Base URL of the futures REST API.
pub const BASE_URL: &str = "https://fapi.binance.com";
/// Ticker-price path; takes a `symbol` query parameter.
pub const PRICE_PATH: &str = "/fapi/v1/ticker/price";
/// Request weight budget per minute. One ticker-price call weighs 1.
pub const WEIGHT_LIMIT_PER_MINUTE: u32 = 2400;
/// Pause between two requests of one fetch worker, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 25;

/// Full ticker-price URL for `symbol` under `base_url`.
pub fn price_url(base_url: &str, symbol: Symbol) -> String {
    format!(
        "{}{}?symbol={}",
        base_url.trim_end_matches('/'),
        PRICE_PATH,
        symbol
    )
}
