//! Price observation value type and exchange quote parsing.
//!
//! A `Tick` is one price for one symbol at one instant (millisecond
//! resolution, UTC). Ticks are built from the exchange ticker-price payload:
//!
//! ```json
//! {"symbol":"XRPUSDT","price":"0.51230000","time":1589437530011}
//! ```
//!
//! `price` may arrive as a JSON string or number, `time` is epoch
//! milliseconds. Any payload that does not map to a valid
//! symbol/price/time triple is rejected with `WatchError::MalformedQuote`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::WatchError;
use crate::result::Result;
use crate::symbols::Symbol;

/// Price field as sent by the exchange.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    /// Plain JSON number.
    Number(f64),
    /// Decimal string, the exchange default.
    Text(String),
}

impl RawPrice {
    fn to_f64(&self) -> Result<f64> {
        match self {
            RawPrice::Number(value) => Ok(*value),
            RawPrice::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|e| WatchError::MalformedQuote(format!("price {text:?}: {e}"))),
        }
    }
}

/// Ticker-price payload before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuote {
    /// Exchange symbol, e.g. `XRPUSDT`.
    pub symbol: String,
    /// Last price.
    pub price: RawPrice,
    /// Exchange timestamp in milliseconds since the Unix epoch.
    pub time: i64,
}

/// One validated price observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    symbol: Symbol,
    price: f64,
    observed_at: DateTime<Utc>,
}

impl Tick {
    /// Build a tick, truncating `observed_at` to whole milliseconds.
    ///
    /// Fails when the price is not a positive finite number.
    pub fn new(symbol: Symbol, price: f64, observed_at: DateTime<Utc>) -> Result<Tick> {
        if !price.is_finite() || price <= 0.0 {
            return Err(WatchError::MalformedQuote(format!(
                "price must be positive and finite, got {price}"
            )));
        }
        let observed_at = DateTime::from_timestamp_millis(observed_at.timestamp_millis())
            .ok_or_else(|| WatchError::MalformedQuote(format!("time {observed_at} out of range")))?;
        Ok(Tick {
            symbol,
            price,
            observed_at,
        })
    }

    /// Build a tick from an epoch-milliseconds timestamp.
    pub fn from_epoch_millis(symbol: Symbol, price: f64, millis: i64) -> Result<Tick> {
        let observed_at = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| WatchError::MalformedQuote(format!("time {millis} out of range")))?;
        Tick::new(symbol, price, observed_at)
    }

    /// Decode and validate a raw ticker-price JSON body.
    pub fn from_json_slice(body: &[u8]) -> Result<Tick> {
        let raw: RawQuote = serde_json::from_slice(body)
            .map_err(|e| WatchError::MalformedQuote(format!("payload: {e}")))?;
        Tick::try_from(raw)
    }

    /// Symbol this observation belongs to.
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Observed price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Observation instant.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// `true` when both ticks carry the same price at the same instant.
    ///
    /// Symbols are not compared; callers only compare ticks of one symbol.
    pub fn same_observation(&self, other: &Tick) -> bool {
        self.price == other.price && self.observed_at == other.observed_at
    }

    /// Order two ticks by observation time.
    pub fn cmp_by_time(&self, other: &Tick) -> Ordering {
        self.observed_at.cmp(&other.observed_at)
    }
}

impl TryFrom<RawQuote> for Tick {
    type Error = WatchError;

    fn try_from(raw: RawQuote) -> Result<Tick> {
        let symbol = Symbol::from_str(raw.symbol.trim())
            .map_err(|_| WatchError::MalformedQuote(format!("unknown symbol {:?}", raw.symbol)))?;
        let price = raw.price.to_f64()?;
        Tick::from_epoch_millis(symbol, price, raw.time)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Tick: {} price {}, time {}>",
            self.symbol,
            self.price,
            self.observed_at.format("%H:%M:%S%.3f")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed(body: &str) -> bool {
        matches!(
            Tick::from_json_slice(body.as_bytes()),
            Err(WatchError::MalformedQuote(_))
        )
    }

    #[test]
    fn parses_exchange_payload_with_string_price() {
        let body = br#"{"symbol":"XRPUSDT","price":"0.51230000","time":1589437530011}"#;
        let tick = Tick::from_json_slice(body).unwrap();
        assert_eq!(tick.symbol(), Symbol::XRPUSDT);
        assert_eq!(tick.price(), 0.5123);
        assert_eq!(tick.observed_at().timestamp_millis(), 1589437530011);
    }

    #[test]
    fn parses_numeric_price_and_ignores_extra_fields() {
        let body = br#"{"symbol":"btcusdt","price":64000.5,"time":0,"extra":true}"#;
        let tick = Tick::from_json_slice(body).unwrap();
        assert_eq!(tick.symbol(), Symbol::BTCUSDT);
        assert_eq!(tick.price(), 64000.5);
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(malformed(r#"{"symbol":"XRPUSDT","price":"abc","time":1}"#));
        assert!(malformed(r#"{"symbol":"XRPUSDT","price":"0","time":1}"#));
        assert!(malformed(r#"{"symbol":"XRPUSDT","price":"-1.5","time":1}"#));
        assert!(malformed(r#"{"symbol":"XRPUSDT","price":"NaN","time":1}"#));
        assert!(malformed(r#"{"symbol":"XRPUSDT","price":"inf","time":1}"#));
        assert!(malformed(r#"{"symbol":"DOGEUSDT","price":"1","time":1}"#));
        assert!(malformed(r#"{"symbol":"XRPUSDT","price":"1","time":"yesterday"}"#));
        assert!(malformed(r#"{"symbol":"XRPUSDT","price":"1"}"#));
        assert!(malformed(r#"{"symbol":"XRPUSDT","price":"1","time":9223372036854775807}"#));
        assert!(malformed("<html>busy</html>"));
    }

    #[test]
    fn new_truncates_to_milliseconds() {
        let at = DateTime::from_timestamp(10, 123_456_789).unwrap();
        let tick = Tick::new(Symbol::XRPUSDT, 1.0, at).unwrap();
        assert_eq!(tick.observed_at().timestamp_millis(), 10_123);
        assert_eq!(tick.observed_at().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn equality_and_time_ordering() {
        let a = Tick::from_epoch_millis(Symbol::XRPUSDT, 1.0, 1_000).unwrap();
        let b = Tick::from_epoch_millis(Symbol::XRPUSDT, 1.0, 1_000).unwrap();
        let c = Tick::from_epoch_millis(Symbol::XRPUSDT, 2.0, 500).unwrap();
        assert_eq!(a, b);
        assert!(a.same_observation(&b));
        assert!(!a.same_observation(&c));
        assert_eq!(c.cmp_by_time(&a), Ordering::Less);
        assert_eq!(a.cmp_by_time(&b), Ordering::Equal);
    }

    #[test]
    fn display_shows_clock_time() {
        let tick = Tick::from_epoch_millis(Symbol::XRPUSDT, 0.5, 3_723_004).unwrap();
        assert_eq!(tick.to_string(), "<Tick: XRPUSDT price 0.5, time 01:02:03.004>");
    }
}
