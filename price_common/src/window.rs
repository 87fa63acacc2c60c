//! Rolling one-hour price window for a single symbol.
//!
//! `WindowAggregator` keeps the ticks of the last hour (measured back from the
//! newest tick, not from the wall clock) sorted by time and free of duplicate
//! `(price, time)` observations. Each accepted tick is checked against the
//! window high with [`drawdown::is_triggered`].
//!
//! The aggregator does no I/O and no locking. Calls may arrive out of time
//! order, but they must be serialized by the owner.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};

use crate::drawdown::{self, WINDOW_SPAN};
use crate::error::WatchError;
use crate::result::Result;
use crate::symbols::Symbol;
use crate::tick::Tick;

/// Outcome of a single [`WindowAggregator::ingest`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ingestion {
    /// The tick was new and has been folded into the window.
    pub accepted: bool,
    /// The tick is at or below the drawdown threshold of the window high.
    pub triggered: bool,
}

/// Sorted, deduplicated one-hour window of ticks.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    symbol: Symbol,
    sequence: VecDeque<Tick>,
    max_price: Option<f64>,
}

impl WindowAggregator {
    /// Create an empty window for `symbol`.
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            sequence: VecDeque::new(),
            max_price: None,
        }
    }

    /// Fold `tick` into the window and evaluate the drawdown rule.
    ///
    /// Duplicates are absorbed with `accepted == false`. A tick for another
    /// symbol is rejected with `WatchError::SymbolMismatch` and leaves the
    /// window untouched.
    pub fn ingest(&mut self, tick: Tick) -> Result<Ingestion> {
        if tick.symbol() != self.symbol {
            return Err(WatchError::SymbolMismatch {
                expected: self.symbol,
                actual: tick.symbol(),
            });
        }

        let accepted = self.insert_sorted(tick);
        // No border before the start of representable time: nothing is older.
        if let Some(min_border) = self
            .sequence
            .back()
            .and_then(|newest| newest.observed_at().checked_sub_signed(WINDOW_SPAN))
        {
            self.evict_before(min_border);
        }
        self.max_price = self.sequence.iter().map(Tick::price).reduce(f64::max);

        let triggered = match self.max_price {
            Some(max_price) if accepted => drawdown::is_triggered(tick.price(), max_price),
            _ => false,
        };
        Ok(Ingestion {
            accepted,
            triggered,
        })
    }

    /// Insert keeping time order; `false` if the same observation is already held.
    fn insert_sorted(&mut self, tick: Tick) -> bool {
        let at = tick.observed_at();
        let first_same_time = self.sequence.partition_point(|t| t.observed_at() < at);
        let after_same_time = self.sequence.partition_point(|t| t.observed_at() <= at);
        if self
            .sequence
            .range(first_same_time..after_same_time)
            .any(|held| held.same_observation(&tick))
        {
            return false;
        }
        self.sequence.insert(after_same_time, tick);
        true
    }

    /// Drop the prefix of ticks observed strictly before `min_border`.
    fn evict_before(&mut self, min_border: DateTime<Utc>) {
        while let Some(oldest) = self.sequence.front() {
            if oldest.observed_at() < min_border {
                self.sequence.pop_front();
            } else {
                break;
            }
        }
    }

    /// Symbol this window was created for.
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Highest price currently in the window, `None` when empty.
    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    /// Number of ticks held.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Ticks in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = &Tick> {
        self.sequence.iter()
    }

    /// Oldest tick still inside the window.
    pub fn oldest(&self) -> Option<&Tick> {
        self.sequence.front()
    }

    /// Most recent tick.
    pub fn newest(&self) -> Option<&Tick> {
        self.sequence.back()
    }

    /// Time covered between the oldest and newest tick.
    pub fn span(&self) -> TimeDelta {
        match (self.oldest(), self.newest()) {
            (Some(oldest), Some(newest)) => newest.observed_at() - oldest.observed_at(),
            _ => TimeDelta::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: i64 = 1_000;

    fn tick(price: f64, millis: i64) -> Tick {
        Tick::from_epoch_millis(Symbol::XRPUSDT, price, millis).unwrap()
    }

    fn times(window: &WindowAggregator) -> Vec<i64> {
        window
            .iter()
            .map(|t| t.observed_at().timestamp_millis())
            .collect()
    }

    #[test]
    fn starts_empty() {
        let window = WindowAggregator::new(Symbol::XRPUSDT);
        assert!(window.is_empty());
        assert_eq!(window.max_price(), None);
        assert_eq!(window.span(), TimeDelta::zero());
    }

    #[test]
    fn first_tick_is_its_own_max_and_does_not_trigger() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        let out = window.ingest(tick(100.0, 0)).unwrap();
        assert_eq!(
            out,
            Ingestion {
                accepted: true,
                triggered: false
            }
        );
        assert_eq!(window.max_price(), Some(100.0));
    }

    #[test]
    fn two_percent_drop_triggers() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(100.0, 0)).unwrap();
        let out = window.ingest(tick(98.0, SECOND)).unwrap();
        assert!(out.accepted);
        assert!(out.triggered);
        assert_eq!(window.max_price(), Some(100.0));
    }

    #[test]
    fn duplicate_is_absorbed() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(100.0, 0)).unwrap();
        window.ingest(tick(98.0, SECOND)).unwrap();

        let out = window.ingest(tick(100.0, 0)).unwrap();
        assert_eq!(out, Ingestion::default());
        assert_eq!(window.len(), 2);
        assert_eq!(window.max_price(), Some(100.0));
    }

    #[test]
    fn duplicate_of_low_tick_does_not_trigger_again() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(100.0, 0)).unwrap();
        assert!(window.ingest(tick(98.0, SECOND)).unwrap().triggered);
        let again = window.ingest(tick(98.0, SECOND)).unwrap();
        assert!(!again.accepted);
        assert!(!again.triggered);
    }

    #[test]
    fn tick_past_the_hour_evicts_everything_older() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(100.0, 0)).unwrap();
        window.ingest(tick(98.0, SECOND)).unwrap();

        let out = window.ingest(tick(150.0, 3_601 * SECOND)).unwrap();
        assert!(out.accepted);
        assert!(!out.triggered);
        assert_eq!(window.len(), 1);
        assert_eq!(window.max_price(), Some(150.0));
    }

    #[test]
    fn tick_exactly_one_hour_old_survives() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(100.0, 0)).unwrap();
        window.ingest(tick(101.0, 3_600 * SECOND)).unwrap();
        assert_eq!(times(&window), vec![0, 3_600 * SECOND]);
        assert_eq!(window.span(), TimeDelta::hours(1));

        window.ingest(tick(101.0, 3_600 * SECOND + 1)).unwrap();
        assert_eq!(times(&window), vec![3_600 * SECOND, 3_600 * SECOND + 1]);
    }

    #[test]
    fn eviction_lowers_the_max() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(200.0, 0)).unwrap();
        window.ingest(tick(100.0, 1_800 * SECOND)).unwrap();
        assert_eq!(window.max_price(), Some(200.0));

        let out = window.ingest(tick(99.5, 3_700 * SECOND)).unwrap();
        assert_eq!(window.max_price(), Some(100.0));
        assert!(!out.triggered);
    }

    #[test]
    fn out_of_order_ticks_are_sorted() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(1.0, 30 * SECOND)).unwrap();
        window.ingest(tick(1.0, 10 * SECOND)).unwrap();
        window.ingest(tick(1.0, 20 * SECOND)).unwrap();
        assert_eq!(times(&window), vec![10 * SECOND, 20 * SECOND, 30 * SECOND]);
    }

    #[test]
    fn late_tick_inside_the_hour_can_trigger() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(100.0, 60 * SECOND)).unwrap();
        let out = window.ingest(tick(90.0, 30 * SECOND)).unwrap();
        assert!(out.accepted);
        assert!(out.triggered);
        assert_eq!(window.oldest().map(Tick::price), Some(90.0));
    }

    #[test]
    fn late_tick_outside_the_hour_is_dropped_right_away() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(100.0, 7_200 * SECOND)).unwrap();
        let out = window.ingest(tick(50.0, 0)).unwrap();
        assert!(out.accepted);
        assert!(out.triggered);
        assert_eq!(window.len(), 1);
        assert_eq!(window.max_price(), Some(100.0));
    }

    #[test]
    fn same_time_different_price_are_both_kept() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        assert!(window.ingest(tick(1.0, SECOND)).unwrap().accepted);
        assert!(window.ingest(tick(2.0, SECOND)).unwrap().accepted);
        assert!(!window.ingest(tick(1.0, SECOND)).unwrap().accepted);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn ticks_at_the_earliest_time_do_not_overflow_the_border() {
        let earliest = DateTime::<Utc>::MIN_UTC;
        let high = Tick::new(Symbol::XRPUSDT, 1.0, earliest + TimeDelta::minutes(30)).unwrap();
        let low = Tick::new(Symbol::XRPUSDT, 0.5, earliest).unwrap();
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        assert!(window.ingest(high).unwrap().accepted);

        let out = window.ingest(low).unwrap();
        assert!(out.accepted);
        assert!(out.triggered);
        assert_eq!(window.len(), 2);
        assert_eq!(window.max_price(), Some(1.0));
    }

    #[test]
    fn quote_near_the_earliest_time_is_ingested() {
        let body = br#"{"symbol":"XRPUSDT","price":"1","time":-8334601228800000}"#;
        let parsed = Tick::from_json_slice(body).unwrap();
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        let out = window.ingest(parsed).unwrap();
        assert!(out.accepted);
        assert!(!out.triggered);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn symbol_mismatch_leaves_window_untouched() {
        let mut window = WindowAggregator::new(Symbol::XRPUSDT);
        window.ingest(tick(100.0, 0)).unwrap();

        let foreign = Tick::from_epoch_millis(Symbol::BTCUSDT, 50.0, SECOND).unwrap();
        let err = window.ingest(foreign).unwrap_err();
        assert!(matches!(
            err,
            WatchError::SymbolMismatch {
                expected: Symbol::XRPUSDT,
                actual: Symbol::BTCUSDT
            }
        ));
        assert_eq!(window.len(), 1);
        assert_eq!(window.max_price(), Some(100.0));
    }
}
