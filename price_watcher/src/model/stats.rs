//! Counters reported when the poller stops.

use std::fmt;

/// What happened to the fetched quotes during one poller run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Requests that produced a valid tick.
    pub fetched: u64,
    /// Requests that failed at the HTTP level.
    pub failed: u64,
    /// Responses that could not be parsed into a tick.
    pub malformed: u64,
    /// Ticks that were new to the window.
    pub accepted: u64,
    /// Ticks already held by the window.
    pub duplicates: u64,
    /// Alerts handed to the sink.
    pub alerts: u64,
}

impl fmt::Display for PollStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PollStats(fetched={}, failed={}, malformed={}, accepted={}, duplicates={}, alerts={})",
            self.fetched, self.failed, self.malformed, self.accepted, self.duplicates, self.alerts
        )
    }
}
