//! Where ticks come from.
//!
//! - `binance` — blocking HTTP client for the exchange ticker-price endpoint.
//! - `simulated` — offline random walk, for running without network access.

pub mod binance;
pub mod simulated;

use price_common::{Result, Tick};

/// A single price quote provider, polled by the fetch workers.
///
/// Implementations are shared between worker threads, so `fetch` takes `&self`.
pub trait QuoteSource: Send + Sync {
    /// Fetch the current price as a tick.
    fn fetch(&self) -> Result<Tick>;
}
