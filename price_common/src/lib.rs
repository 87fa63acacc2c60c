//!
//! Core types of the drawdown watcher.
//!
//! This crate aggregates:
//! - `error` — unified error type `WatchError` used across the workspace.
//! - `result` — handy `Result<T, WatchError>` alias.
//! - `symbols` — exchange symbols a watcher can track.
//! - `tick` — the `Tick` price observation and exchange quote parsing.
//! - `drawdown` — window span and the 1% drawdown alert rule.
//! - `window` — `WindowAggregator`, the rolling one-hour window.
//! - `endpoint` — exchange URLs and request budget constants.
#![warn(missing_docs)]
pub mod drawdown;
pub mod endpoint;
pub mod error;
pub mod result;
pub mod symbols;
pub mod tick;
pub mod window;

pub use error::WatchError;
pub use result::Result;
pub use symbols::Symbol;
pub use tick::Tick;
pub use window::{Ingestion, WindowAggregator};
