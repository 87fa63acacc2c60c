//! Data types and helpers used by the poller:
//! - `alert` — drawdown `Alert` and the `AlertSink` it is delivered to.
//! - `rate_limiter` — token bucket shared by the fetch workers.
//! - `stats` — per-run `PollStats` counters.

pub mod alert;
pub mod rate_limiter;
pub mod stats;
