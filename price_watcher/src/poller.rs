//! Fetch-worker pool feeding a single-writer ingest loop.
//!
//! `max_in_flight` worker threads each run: take a token from the shared
//! [`RateLimiter`], fetch one quote, push the result into a bounded channel,
//! sleep for the pacing interval. At most `max_in_flight` requests are
//! outstanding at any time.
//!
//! The calling thread owns the [`WindowAggregator`] and is the only one that
//! touches it. It drains the channel and:
//! - logs and skips malformed quotes and failed requests (the next cycle is the retry);
//! - hands triggered ticks to the [`AlertSink`];
//! - stops everything and returns the error on `SymbolMismatch`.
//!
//! The run ends when the shared shutdown flag is raised (Ctrl+C) and every
//! worker has delivered its last result.

use crate::model::alert::{Alert, AlertSink};
use crate::model::rate_limiter::{self, RateLimiter};
use crate::model::stats::PollStats;
use crate::source::QuoteSource;
use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, error, info, warn};
use price_common::endpoint::{POLL_INTERVAL_MS, WEIGHT_LIMIT_PER_MINUTE};
use price_common::{Result, Tick, WatchError, WindowAggregator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pacing and concurrency limits of a poller run.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Pause of each worker between two requests.
    pub interval: Duration,
    /// Number of fetch workers, i.e. the cap on concurrent requests.
    pub max_in_flight: usize,
    /// Average request budget shared by all workers.
    pub requests_per_minute: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(POLL_INTERVAL_MS),
            max_in_flight: 4,
            requests_per_minute: WEIGHT_LIMIT_PER_MINUTE,
        }
    }
}

/// Polls one quote source and keeps a window up to date.
pub struct Poller {
    source: Arc<dyn QuoteSource>,
    config: PollerConfig,
    shutdown: Arc<AtomicBool>,
}

impl Poller {
    /// Create a poller; raising `shutdown` ends [`Poller::run`].
    pub fn new(
        source: Arc<dyn QuoteSource>,
        config: PollerConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            config,
            shutdown,
        }
    }

    /// Run until shutdown or a fatal error, returning the run counters.
    pub fn run<A: AlertSink>(
        &self,
        window: &mut WindowAggregator,
        sink: &mut A,
    ) -> Result<PollStats> {
        let workers_count = self.config.max_in_flight.max(1);
        let limiter = Arc::new(Mutex::new(RateLimiter::new(
            self.config.requests_per_minute,
        )));
        let (result_tx, result_rx) = bounded::<Result<Tick>>(workers_count);

        info!(
            "Polling {} with {} workers, {} requests/min, {:?} pacing",
            window.symbol(),
            workers_count,
            self.config.requests_per_minute,
            self.config.interval
        );

        let mut workers = Vec::with_capacity(workers_count);
        for id in 0..workers_count {
            workers.push(self.spawn_worker(id, Arc::clone(&limiter), result_tx.clone())?);
        }
        drop(result_tx);

        let mut stats = PollStats::default();
        let outcome = ingest_loop(&result_rx, window, sink, &mut stats);
        if let Err(e) = &outcome {
            error!("Stopping poller: {}", e);
        }

        self.shutdown.store(true, Ordering::SeqCst);
        drop(result_rx);
        for handle in workers {
            if handle.join().is_err() {
                error!("Fetch worker panicked");
            }
        }
        outcome.map(|()| stats)
    }

    fn spawn_worker(
        &self,
        id: usize,
        limiter: Arc<Mutex<RateLimiter>>,
        results: Sender<Result<Tick>>,
    ) -> Result<JoinHandle<()>> {
        let source = Arc::clone(&self.source);
        let shutdown = Arc::clone(&self.shutdown);
        let interval = self.config.interval;
        let handle = thread::Builder::new()
            .name(format!("fetch-{id}"))
            .spawn(move || fetch_worker(source, limiter, results, shutdown, interval))?;
        Ok(handle)
    }
}

fn fetch_worker(
    source: Arc<dyn QuoteSource>,
    limiter: Arc<Mutex<RateLimiter>>,
    results: Sender<Result<Tick>>,
    shutdown: Arc<AtomicBool>,
    interval: Duration,
) {
    loop {
        match rate_limiter::acquire(&limiter, &shutdown) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("Rate limiter unavailable: {}", e);
                break;
            }
        }
        if results.send(source.fetch()).is_err() {
            break;
        }
        thread::sleep(interval);
    }
    debug!("Fetch worker stopping");
}

fn ingest_loop<A: AlertSink>(
    results: &Receiver<Result<Tick>>,
    window: &mut WindowAggregator,
    sink: &mut A,
    stats: &mut PollStats,
) -> Result<()> {
    for result in results.iter() {
        match result {
            Ok(tick) => {
                stats.fetched += 1;
                ingest_tick(tick, window, sink, stats)?;
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(WatchError::MalformedQuote(reason)) => {
                stats.malformed += 1;
                warn!("Skipping malformed quote: {}", reason);
            }
            Err(e) => {
                stats.failed += 1;
                error!("Price request failed: {}", e);
            }
        }
    }
    Ok(())
}

fn ingest_tick<A: AlertSink>(
    tick: Tick,
    window: &mut WindowAggregator,
    sink: &mut A,
    stats: &mut PollStats,
) -> Result<()> {
    let outcome = window.ingest(tick)?;
    if !outcome.accepted {
        stats.duplicates += 1;
        return Ok(());
    }

    stats.accepted += 1;
    debug!(
        "New window length is {}, max price is {:?}",
        window.len(),
        window.max_price()
    );
    debug!("Updated by {}", tick);

    if outcome.triggered {
        if let Some(max_price) = window.max_price() {
            stats.alerts += 1;
            sink.notify(&Alert { tick, max_price });
        }
    }
    Ok(())
}
