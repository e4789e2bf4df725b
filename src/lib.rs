//! Retry a fallible async operation against a precomputed backoff schedule.
//!
//! The engine wraps a caller-supplied operation that may fail and re-invokes
//! it according to an exponential delay schedule until it succeeds, the
//! schedule is exhausted, or a failure is terminal. Failures are structured
//! [`Failure`] values: aborts stop the session unconditionally, unknown
//! type-kind failures are fatal, everything else is retried. When retries run
//! out, the caller sees the representative failure of the session: the most
//! frequent message observed, ties resolved to the most recent.
//!
//! # Example
//!
//! ```
//! use reattempt::{retry, Failure};
//!
//! # tokio_test::block_on(async {
//! // The operation receives the 1-based attempt number.
//! let result = retry(|attempt| async move {
//!     if attempt < 3 {
//!         Err(Failure::other("connection reset"))
//!     } else {
//!         Ok("ready")
//!     }
//! })
//! .await;
//!
//! assert_eq!(result, Ok("ready"));
//! # });
//! ```
//!
//! Configuration goes through [`RetryOptions`]; an [`AttemptObserver`] is
//! notified before each scheduled retry and may delay or abandon the session;
//! [`RetryEngine::cancellation_token`] stops a session externally.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod classify;
pub mod constants;
pub mod engine;
pub mod error;
pub mod observer;
pub mod options;
pub mod schedule;

pub use classify::{
    classify, is_retryable, is_transient_network_message, Classification,
    TRANSIENT_NETWORK_MESSAGES,
};
pub use engine::{retry, retry_with_options, RetryEngine};
pub use error::{AbortError, AttemptError, Failure, RetryError, RetryResult};
pub use observer::{AttemptObserver, NoopObserver, ObserverFn};
pub use options::{RetryOptions, RetryOptionsBuilder};
pub use schedule::{Schedule, ScheduleConfig};
