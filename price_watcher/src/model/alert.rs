//! Drawdown alerts and where they are delivered.

use log::warn;
use price_common::Tick;
use std::fmt;

/// A tick that fell at least 1% below the hourly high.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// The tick that fired the alert.
    pub tick: Tick,
    /// Window high at the moment the tick was ingested.
    pub max_price: f64,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is below the hourly high = {} by 1%",
            self.tick, self.max_price
        )
    }
}

/// Receiver of drawdown alerts.
pub trait AlertSink {
    /// Deliver one alert.
    fn notify(&mut self, alert: &Alert);
}

/// Emits alerts as `warn` log records.
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&mut self, alert: &Alert) {
        warn!("{}", alert);
    }
}

/// Keeps alerts in memory.
impl AlertSink for Vec<Alert> {
    fn notify(&mut self, alert: &Alert) {
        self.push(alert.clone());
    }
}
