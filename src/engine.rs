//! The retry engine.
//!
//! [`EngineState`] is the explicit state machine: it owns the attempt
//! counter, the error accumulator and the remaining schedule, and decides
//! every `Failed` transition through a single entry point, pure over an
//! injected elapsed duration. [`RetryEngine`] is the async driver around it:
//! it invokes the operation, captures panics, awaits the failure observer and
//! sleeps out backoff delays on the host timer, racing each delay against the
//! engine's cancellation token.
//!
//! Session shape: `Attempting -> (Success | Failed)`;
//! `Failed -> (Retrying | Aborted | Exhausted)`; `Retrying -> Attempting`.
//! `Success`, `Aborted` and `Exhausted` are terminal and settle the returned
//! future exactly once.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::classify::{classify, Classification};
use crate::constants::{CANCELLED_MESSAGE, MAX_RETRY_TIME_MESSAGE};
use crate::error::{AttemptError, Failure, RetryResult};
use crate::observer::{AttemptObserver, NoopObserver};
use crate::options::RetryOptions;
use crate::schedule::Schedule;

/// Retry a fallible async operation with the default options.
///
/// The operation receives the current attempt number, starting at 1. See
/// [`RetryEngine::run`] for the full contract.
///
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// use reattempt::{retry, Failure};
///
/// # tokio_test::block_on(async {
/// let calls = AtomicU32::new(0);
/// let calls = &calls;
/// let result = retry(|_attempt| async move {
///     if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///         Err(Failure::other("Network request failed"))
///     } else {
///         Ok(42)
///     }
/// })
/// .await;
///
/// assert_eq!(result, Ok(42));
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # });
/// ```
pub async fn retry<T, F, Fut>(operation: F) -> RetryResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    RetryEngine::new(RetryOptions::default()).run(operation).await
}

/// Retry a fallible async operation with the given options.
pub async fn retry_with_options<T, F, Fut>(options: RetryOptions, operation: F) -> RetryResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    RetryEngine::new(options).run(operation).await
}

/// Drives one operation through attempts, backoff delays and terminal
/// settlement.
pub struct RetryEngine<O = NoopObserver> {
    options: RetryOptions,
    observer: O,
    cancel: CancellationToken,
}

impl RetryEngine<NoopObserver> {
    /// Create an engine with the given options and no failure observer.
    pub fn new(options: RetryOptions) -> Self {
        Self::with_observer(options, NoopObserver)
    }
}

impl<O> RetryEngine<O> {
    /// Create an engine with the given options and failure observer.
    pub fn with_observer(options: RetryOptions, observer: O) -> Self {
        Self { options, observer, cancel: CancellationToken::new() }
    }

    /// The engine's configuration.
    pub fn options(&self) -> &RetryOptions {
        &self.options
    }

    /// A handle to the engine's cancellation token.
    ///
    /// Cancelling it stops the session at the next retry-decision point: any
    /// pending backoff timer is released and the engine settles with a
    /// cancellation failure. An in-flight attempt is never preempted.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl<O> RetryEngine<O>
where
    O: AttemptObserver,
{
    /// Run the operation until it succeeds, a failure is terminal, or the
    /// schedule is exhausted.
    ///
    /// The operation receives the current attempt number, starting at 1, and
    /// must fail with a structured [`Failure`]; panicking instead settles the
    /// session immediately with a `Non-error was thrown` type failure. The
    /// returned future settles exactly once.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> RetryResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        self.options.validate()?;

        let schedule = Schedule::generate(&self.options.schedule_config());
        let mut state = EngineState::new(self.options.retries, schedule);
        let started = Instant::now();

        loop {
            if self.cancel.is_cancelled() {
                debug!("retry session cancelled, not attempting");
                return Err(Failure::other(CANCELLED_MESSAGE).into());
            }

            let attempt = state.attempt_number();
            debug!(attempt, retries = self.options.retries, "starting attempt");

            let failure = match AssertUnwindSafe(operation(attempt)).catch_unwind().await {
                Ok(Ok(value)) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Ok(Err(failure)) => failure,
                Err(payload) => {
                    let failure = non_error_failure(payload);
                    warn!(attempt, error = %failure, "operation panicked, settling immediately");
                    return Err(failure.into());
                }
            };

            match state.on_failure(failure, started.elapsed()) {
                Transition::Reject(failure) => {
                    warn!(attempt, error = %failure, "retry session settled with failure");
                    return Err(failure.into());
                }
                Transition::Retry { delay, notice } => {
                    warn!(
                        attempt = notice.attempt_number(),
                        retries_left = notice.retries_left(),
                        delay_ms = delay.as_millis() as u64,
                        error = %notice,
                        "attempt failed, backing off"
                    );

                    // Observer failures settle the session as-is; retry
                    // history is discarded.
                    self.observer.on_failed_attempt(&notice).await?;

                    tokio::select! {
                        () = self.cancel.cancelled() => {
                            debug!("retry session cancelled during backoff");
                            return Err(Failure::other(CANCELLED_MESSAGE).into());
                        }
                        () = sleep(delay) => {}
                    }
                }
            }
        }
    }
}

impl<O> fmt::Debug for RetryEngine<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryEngine")
            .field("options", &self.options)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Next step the driver must take after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Transition {
    /// Notify the observer with `notice`, wait `delay`, then re-attempt.
    Retry { delay: Duration, notice: AttemptError },
    /// Settle the session with the failure.
    Reject(Failure),
}

/// Mutable per-session state and the `Failed` transition logic.
///
/// Pure over the injected elapsed duration: no timers, no clocks. The driver
/// owns the timing and feeds wall-clock elapsed time in.
#[derive(Debug)]
struct EngineState {
    attempt_number: u32,
    retries: u32,
    schedule: Schedule,
    errors: Vec<Failure>,
}

impl EngineState {
    fn new(retries: u32, schedule: Schedule) -> Self {
        Self { attempt_number: 1, retries, schedule, errors: Vec::new() }
    }

    /// Current attempt number, 1-based. Never decremented.
    fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    /// Retries remaining before the session exhausts.
    fn retries_left(&self) -> u32 {
        self.retries.saturating_sub(self.attempt_number - 1)
    }

    /// Decide what a failed attempt leads to.
    ///
    /// `elapsed` is the wall-clock time since the first attempt started,
    /// compared against the schedule's maximum retry time, a soft budget
    /// enforced only here at the retry-decision point.
    fn on_failure(&mut self, failure: Failure, elapsed: Duration) -> Transition {
        match classify(&failure) {
            Classification::Aborted => {
                // classify() only yields Aborted for Failure::Abort.
                let original = match failure {
                    Failure::Abort(abort) => abort.into_original(),
                    other => other,
                };
                Transition::Reject(original)
            }
            Classification::Fatal => Transition::Reject(failure),
            Classification::Retryable => {
                self.errors.push(failure.clone());

                if elapsed >= self.schedule.max_retry_time() {
                    self.errors.insert(0, Failure::other(MAX_RETRY_TIME_MESSAGE));
                    return Transition::Reject(self.representative(failure));
                }

                match self.schedule.next_delay() {
                    None => Transition::Reject(self.representative(failure)),
                    Some(delay) => {
                        let notice =
                            AttemptError::new(&failure, self.attempt_number, self.retries_left());
                        self.attempt_number += 1;
                        Transition::Retry { delay, notice }
                    }
                }
            }
        }
    }

    /// Representative failure for an exhausted session, falling back to the
    /// triggering failure (the accumulator is never empty here, since the
    /// trigger was just recorded).
    fn representative(&self, fallback: Failure) -> Failure {
        main_error(&self.errors).unwrap_or(fallback)
    }
}

/// Select the representative failure from a chronological accumulator.
///
/// Groups by exact message and scans in order, keeping the failure with the
/// highest count seen so far under a non-strict (`>=`) update rule, so ties
/// prefer the most recently seen failure. An empty accumulator yields `None`.
fn main_error(errors: &[Failure]) -> Option<Failure> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut main: Option<&Failure> = None;
    let mut main_count = 0u32;

    for failure in errors {
        let count = counts.entry(failure.message()).and_modify(|c| *c += 1).or_insert(1);
        if *count >= main_count {
            main = Some(failure);
            main_count = *count;
        }
    }

    main.cloned()
}

/// Build the fixed rejection for an operation that panicked instead of
/// failing with a structured [`Failure`].
fn non_error_failure(payload: Box<dyn Any + Send>) -> Failure {
    let repr = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("<non-string panic payload>")
    };
    Failure::type_error(format!("Non-error was thrown: \"{repr}\". You should only throw errors."))
}
