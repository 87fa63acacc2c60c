//! Error types shared by the window core and the watcher binary.
//!
//! The `WatchError` enum unifies quote parsing failures, window misuse, HTTP
//! and lock failures, so every layer can propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

use crate::symbols::Symbol;

/// Unified error type shared by the aggregator and the poller.
#[derive(Error, Debug)]
pub enum WatchError {
    /// I/O error originating from the standard library (log files, sockets).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// The price source answered with a payload that does not map to a valid tick.
    #[error("Malformed quote: {0}")]
    MalformedQuote(String),

    /// A tick for another symbol reached a window. This is a wiring defect.
    #[error("Symbol mismatch: window tracks {expected}, got tick for {actual}")]
    SymbolMismatch {
        /// Symbol the window was created for.
        expected: Symbol,
        /// Symbol carried by the rejected tick.
        actual: Symbol,
    },

    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The exchange answered with a non-success status code.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl WatchError {
    /// Returns `true` for errors after which the window can no longer be trusted.
    ///
    /// Everything else is per-cycle noise: the poller logs it and moves on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WatchError::SymbolMismatch { .. })
    }
}

impl<T> From<PoisonError<T>> for WatchError {
    fn from(err: PoisonError<T>) -> Self {
        WatchError::MutexLock(err.to_string())
    }
}
