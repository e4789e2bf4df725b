//! Retry delay schedule generation.
//!
//! A [`Schedule`] is the precomputed, ordered sequence of delays a retry
//! session consumes front-to-back, one entry per retry. The first attempt has
//! no entry; a session configured with `retries` entries therefore performs at
//! most `retries + 1` attempts. The last entry doubles as the session's
//! maximum total retry time.

use std::collections::VecDeque;
use std::time::Duration;

use crate::constants::{
    DEFAULT_SCHEDULE_FACTOR, DEFAULT_SCHEDULE_MIN_TIMEOUT, DEFAULT_SCHEDULE_RETRIES,
    MIN_TIMEOUT_FLOOR,
};

/// Parameters for generating a retry delay schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleConfig {
    /// Number of entries to produce, one per retry.
    pub retries: u32,
    /// Minimum delay. Values below 1 ms are clamped to 1 ms so the
    /// exponential base is never zero.
    pub min_timeout: Duration,
    /// Absolute cap applied to every delay.
    pub max_timeout: Duration,
    /// Exponential growth factor.
    pub factor: f64,
}

impl Default for ScheduleConfig {
    /// Standalone generation defaults: 5 retries, 10 ms floor, unbounded cap,
    /// growth factor 6.
    fn default() -> Self {
        Self {
            retries: DEFAULT_SCHEDULE_RETRIES,
            min_timeout: DEFAULT_SCHEDULE_MIN_TIMEOUT,
            max_timeout: Duration::MAX,
            factor: DEFAULT_SCHEDULE_FACTOR,
        }
    }
}

/// An ordered, finite sequence of retry delays.
///
/// Monotonically non-decreasing for growth factors >= 1, each entry capped at
/// the configured maximum. Generated once per retry session and consumed
/// front-to-back via [`Schedule::next_delay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    delays: VecDeque<Duration>,
    max_retry_time: Duration,
}

impl Schedule {
    /// Generate a schedule from the given parameters.
    ///
    /// Entry `i` is `round(effective_min * factor^i)` milliseconds, capped at
    /// `max_timeout`, where `effective_min` is `min_timeout` clamped to at
    /// least 1 ms. An empty schedule (`retries == 0`) reports a
    /// [`Schedule::max_retry_time`] of zero, the immediate-expiry sentinel.
    pub fn generate(config: &ScheduleConfig) -> Self {
        let floor_ms = config.min_timeout.max(MIN_TIMEOUT_FLOOR).as_millis() as f64;
        let cap_ms = config.max_timeout.as_millis() as f64;

        let mut delays = VecDeque::with_capacity(config.retries as usize);
        for i in 0..config.retries {
            let exponent = i.min(i32::MAX as u32) as i32;
            let delay_ms = (floor_ms * config.factor.powi(exponent)).round().min(cap_ms);
            delays.push_back(Duration::from_millis(delay_ms as u64));
        }

        let max_retry_time = delays.back().copied().unwrap_or(Duration::ZERO);
        Self { delays, max_retry_time }
    }

    /// Pop the next delay off the front of the schedule.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.delays.pop_front()
    }

    /// Maximum total retry time for the session: the last generated entry, or
    /// zero for an empty schedule. Stable across consumption.
    pub fn max_retry_time(&self) -> Duration {
        self.max_retry_time
    }

    /// Number of remaining entries.
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Whether the schedule has been fully consumed (or was generated empty).
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// Iterate over the remaining delays without consuming them.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        self.delays.iter().copied()
    }
}
