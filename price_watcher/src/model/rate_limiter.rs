//! Token-bucket limiter shared by the fetch workers.
//!
//! The bucket holds at most one second worth of request budget and refills
//! continuously at `requests_per_minute / 60` tokens per second. Time is taken
//! from `std::time::Instant`, so wall-clock jumps do not refill or drain it.
//!
//! The limiter itself is not synchronized. Workers share it behind a `Mutex`
//! and use [`acquire`], which releases the lock while sleeping.

use price_common::Result;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound on a single wait, so shutdown is noticed quickly.
const MAX_WAIT: Duration = Duration::from_millis(100);

/// Token bucket for outgoing requests.
pub struct RateLimiter {
    tokens: f64,
    max_tokens: f64,
    rate_per_sec: f64,
    last_update: Instant,
}

impl RateLimiter {
    /// Create a full bucket allowing `requests_per_minute` on average.
    pub fn new(requests_per_minute: u32) -> Self {
        Self::new_at(requests_per_minute, Instant::now())
    }

    fn new_at(requests_per_minute: u32, now: Instant) -> Self {
        let rate_per_sec = f64::from(requests_per_minute.max(1)) / 60.0;
        let max_tokens = rate_per_sec.max(1.0);
        Self {
            tokens: max_tokens,
            max_tokens,
            rate_per_sec,
            last_update: now,
        }
    }

    /// Take a token if one is available at `now`.
    ///
    /// Returns the time to wait for the next token otherwise.
    pub fn try_acquire_at(&mut self, now: Instant) -> std::result::Result<(), Duration> {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            return Ok(());
        }
        let missing = 1.0 - self.tokens;
        Err(Duration::from_secs_f64(missing / self.rate_per_sec))
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate_per_sec).min(self.max_tokens);
        self.last_update = now;
    }
}

/// Block until `limiter` hands out a token.
///
/// Returns `Ok(false)` if `shutdown` was raised while waiting.
pub fn acquire(limiter: &Mutex<RateLimiter>, shutdown: &AtomicBool) -> Result<bool> {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return Ok(false);
        }
        let wait = match limiter.lock()?.try_acquire_at(Instant::now()) {
            Ok(()) => return Ok(true),
            Err(wait) => wait,
        };
        thread::sleep(wait.min(MAX_WAIT));
    }
}
