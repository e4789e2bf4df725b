//! Failure observers.
//!
//! The engine hands every failure that is about to be retried to an
//! [`AttemptObserver`] before sleeping out the backoff delay. Observers may be
//! asynchronous; the engine awaits their completion, so a slow observer delays
//! the next attempt. An observer that returns a failure terminates the
//! session with exactly that failure.

use async_trait::async_trait;

use crate::error::{AttemptError, Failure};

/// Receives each failed attempt that will be retried.
#[async_trait]
pub trait AttemptObserver: Send + Sync {
    /// Called once per scheduled retry with the decorated failure.
    ///
    /// Returning `Err` abandons the session immediately; the engine settles
    /// with the returned failure and makes no further attempts.
    async fn on_failed_attempt(&self, attempt: &AttemptError) -> Result<(), Failure>;
}

/// Observer that ignores every failed attempt. The engine default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait]
impl AttemptObserver for NoopObserver {
    async fn on_failed_attempt(&self, _attempt: &AttemptError) -> Result<(), Failure> {
        Ok(())
    }
}

/// Adapter turning a plain closure into an [`AttemptObserver`].
pub struct ObserverFn<F> {
    callback: F,
}

impl<F> ObserverFn<F>
where
    F: Fn(&AttemptError) -> Result<(), Failure> + Send + Sync,
{
    /// Wrap a synchronous callback.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> std::fmt::Debug for ObserverFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObserverFn(<function>)")
    }
}

#[async_trait]
impl<F> AttemptObserver for ObserverFn<F>
where
    F: Fn(&AttemptError) -> Result<(), Failure> + Send + Sync,
{
    async fn on_failed_attempt(&self, attempt: &AttemptError) -> Result<(), Failure> {
        (self.callback)(attempt)
    }
}
