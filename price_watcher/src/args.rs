//! Command-line arguments for the price watcher.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use crate::poller::PollerConfig;
use clap::Parser;
use price_common::Symbol;
use price_common::endpoint::{BASE_URL, POLL_INTERVAL_MS, WEIGHT_LIMIT_PER_MINUTE};
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Symbol to watch.
    #[clap(long, value_enum, default_value_t = Symbol::XRPUSDT)]
    pub symbol: Symbol,

    /// Base URL of the exchange REST API.
    #[clap(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Pause of each fetch worker between two requests, in milliseconds.
    #[clap(long, default_value_t = POLL_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Maximum number of requests in flight at once.
    #[clap(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_in_flight: u32,

    /// Request budget per minute shared by all workers.
    #[clap(long, default_value_t = WEIGHT_LIMIT_PER_MINUTE, value_parser = clap::value_parser!(u32).range(1..))]
    pub requests_per_minute: u32,

    /// Per-request timeout, in milliseconds.
    #[clap(long, default_value_t = 2000)]
    pub timeout_ms: u64,

    /// Use an offline random-walk source instead of the exchange.
    #[clap(long)]
    pub simulate: bool,

    /// Also append log records to this file (debug level by default).
    #[clap(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Poller limits derived from the flags.
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(self.interval_ms),
            max_in_flight: self.max_in_flight as usize,
            requests_per_minute: self.requests_per_minute,
        }
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
