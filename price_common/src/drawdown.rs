//! Drawdown alert rule.

use chrono::TimeDelta;

/// Alert when the price is at or below this fraction of the window high (a 1% drop).
pub const DRAWDOWN_RATIO: f64 = 0.99;

/// How far back the window reaches from its newest tick.
pub const WINDOW_SPAN: TimeDelta = TimeDelta::hours(1);

/// `true` when `price` sits at or below `DRAWDOWN_RATIO` of `max_price`.
pub fn is_triggered(price: f64, max_price: f64) -> bool {
    price <= max_price * DRAWDOWN_RATIO
}
