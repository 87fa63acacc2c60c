//! Hourly drawdown watcher.
//!
//! This binary polls the exchange ticker-price endpoint for one symbol, keeps
//! the last hour of distinct price observations, and logs a warning whenever
//! a new price is at least 1% below the highest price of that hour.
//!
//! It wires together three building blocks:
//!
//! - `QuoteSource` — produces ticks; either the exchange HTTP endpoint or an
//!   offline random walk (`--simulate`).
//! - `Poller` — a fixed pool of fetch workers sharing a token-bucket rate
//!   limiter, so the number of requests in flight and the request rate are
//!   both bounded. Results travel over a bounded `crossbeam_channel`.
//! - `WindowAggregator` — owned by the main thread only; every fetched tick
//!   is folded into it sequentially, and triggered ticks go to the alert sink.
//!
//! Shutdown:
//! - Ctrl+C raises a shared flag; workers finish their current request, the
//!   main thread drains what they delivered and prints the run counters.
//! - A tick for another symbol is a wiring defect: the run stops and the
//!   process exits with the `SymbolMismatch` error.
//!
//! Usage example (CLI):
//! ```bash
//! RUST_LOG=debug price_watcher --symbol xrpusdt --max-in-flight 4 --interval-ms 25
//! ```
#![warn(missing_docs)]
use crate::args::Args;
use crate::logging::init_logger;
use crate::model::alert::LogAlertSink;
use crate::poller::Poller;
use crate::source::QuoteSource;
use crate::source::binance::BinanceQuoteSource;
use crate::source::simulated::SimulatedQuoteSource;
use clap::Parser;
use log::info;
use price_common::Result;
use price_common::{WatchError, WindowAggregator};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

mod args;
mod logging;
pub mod model;
mod poller;
mod source;

fn main() -> Result<(), WatchError> {
    let args = Args::parse();
    init_logger(args.log_file.as_deref())?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down watcher...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| WatchError::Format(format!("failed to set Ctrl+C handler: {e}")))?;
    }

    let source: Arc<dyn QuoteSource> = if args.simulate {
        info!("Using simulated quotes for {}", args.symbol);
        Arc::new(SimulatedQuoteSource::for_symbol(args.symbol))
    } else {
        let source = BinanceQuoteSource::new(&args.base_url, args.symbol, args.timeout())?;
        info!("Using exchange quotes from {}", source.url());
        Arc::new(source)
    };

    let poller = Poller::new(source, args.poller_config(), shutdown);
    let mut window = WindowAggregator::new(args.symbol);
    let mut sink = LogAlertSink;

    info!("Watcher is running. Press Ctrl+C to exit.");
    let stats = poller.run(&mut window, &mut sink)?;
    info!(
        "Watcher stopped: {}; window holds {} ticks, max price {:?}",
        stats,
        window.len(),
        window.max_price()
    );
    Ok(())
}

