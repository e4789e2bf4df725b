//! Engine configuration.

use std::time::Duration;

use crate::constants::{DEFAULT_FACTOR, DEFAULT_MAX_TIMEOUT, DEFAULT_MIN_TIMEOUT, DEFAULT_RETRIES};
use crate::error::{RetryError, RetryResult};
use crate::schedule::ScheduleConfig;

/// Configuration for a retry session.
///
/// Caller-supplied options merge over the defaults via the builder; the
/// engine validates the result synchronously before the first attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOptions {
    /// Number of retries after the initial attempt.
    pub retries: u32,
    /// Exponential growth factor for the delay schedule.
    pub factor: f64,
    /// Minimum delay before the first retry.
    pub min_timeout: Duration,
    /// Absolute cap applied to every delay.
    pub max_timeout: Duration,
}

impl Default for RetryOptions {
    /// Engine defaults: 3 retries, factor 2, 1 s minimum delay, unbounded
    /// cap.
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            factor: DEFAULT_FACTOR,
            min_timeout: DEFAULT_MIN_TIMEOUT,
            max_timeout: DEFAULT_MAX_TIMEOUT,
        }
    }
}

impl RetryOptions {
    /// Start building options on top of the defaults.
    pub fn builder() -> RetryOptionsBuilder {
        RetryOptionsBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// The only invariant is `min_timeout <= max_timeout`; a violation is a
    /// fatal configuration error raised before any attempt.
    pub fn validate(&self) -> Result<(), RetryError> {
        if self.min_timeout > self.max_timeout {
            return Err(RetryError::invalid_configuration(format!(
                "min_timeout ({:?}) cannot be greater than max_timeout ({:?})",
                self.min_timeout, self.max_timeout
            )));
        }
        Ok(())
    }

    /// Schedule parameters for this configuration.
    pub(crate) fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig {
            retries: self.retries,
            min_timeout: self.min_timeout,
            max_timeout: self.max_timeout,
            factor: self.factor,
        }
    }
}

/// Builder for [`RetryOptions`] with a fluent API.
#[derive(Debug, Default)]
pub struct RetryOptionsBuilder {
    options: RetryOptions,
}

impl RetryOptionsBuilder {
    /// Start from the default options.
    pub fn new() -> Self {
        Self { options: RetryOptions::default() }
    }

    /// Number of retries after the initial attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.options.retries = retries;
        self
    }

    /// Exponential growth factor.
    pub fn factor(mut self, factor: f64) -> Self {
        self.options.factor = factor;
        self
    }

    /// Minimum delay before the first retry.
    pub fn min_timeout(mut self, min_timeout: Duration) -> Self {
        self.options.min_timeout = min_timeout;
        self
    }

    /// Absolute cap applied to every delay.
    pub fn max_timeout(mut self, max_timeout: Duration) -> Self {
        self.options.max_timeout = max_timeout;
        self
    }

    /// Validate and produce the options.
    pub fn build(self) -> RetryResult<RetryOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}
