//! Offline quote source.
//!
//! Produces a random walk around a per-symbol reference price, stamped with
//! the current time. Useful for trying the watcher without exchange access.

use crate::source::QuoteSource;
use chrono::Utc;
use price_common::{Result, Symbol, Tick};
use rand::Rng;
use std::sync::Mutex;

/// Random-walk quote source for one symbol.
pub struct SimulatedQuoteSource {
    symbol: Symbol,
    last_price: Mutex<f64>,
}

impl SimulatedQuoteSource {
    /// Start the walk at `start_price`.
    pub fn new(symbol: Symbol, start_price: f64) -> Self {
        Self {
            symbol,
            last_price: Mutex::new(start_price),
        }
    }

    /// Start the walk at a rough market price for `symbol`.
    pub fn for_symbol(symbol: Symbol) -> Self {
        let start_price = match symbol {
            Symbol::XRPUSDT => 0.5,
            Symbol::BTCUSDT => 60_000.0,
            Symbol::ETHUSDT => 3_000.0,
        };
        Self::new(symbol, start_price)
    }

    /// Next price of the walk: a uniform step in `[-1%, +1%)`, floored at 0.01.
    pub fn next_price(current_price: f64) -> f64 {
        let mut rng = rand::rng();
        let change: f64 = rng.random_range(-0.01..0.01);
        let new_price = current_price * (1.0 + change);
        new_price.max(0.01)
    }
}

impl QuoteSource for SimulatedQuoteSource {
    fn fetch(&self) -> Result<Tick> {
        let mut last_price = self.last_price.lock()?;
        *last_price = Self::next_price(*last_price);
        Tick::new(self.symbol, *last_price, Utc::now())
    }
}
