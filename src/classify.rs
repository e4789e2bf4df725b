//! Failure classification.
//!
//! Pure predicates that decide whether a [`Failure`] stops the session or
//! schedules another attempt. Classification depends only on the variant tag
//! and the message, so identical inputs always classify identically.

use crate::error::Failure;

/// Known transient network failure messages (exact, case-sensitive match).
///
/// A [`Failure::Type`] carrying one of these messages is retryable; any other
/// `Type` failure is treated as a programming error and stops the session.
pub const TRANSIENT_NETWORK_MESSAGES: &[&str] = &[
    // Chrome
    "Failed to fetch",
    // Firefox
    "NetworkError when attempting to fetch resource.",
    // Safari
    "The Internet connection appears to be offline.",
    // `cross-fetch`
    "Network request failed",
];

/// Whether `message` is one of the known transient network signatures.
pub fn is_transient_network_message(message: &str) -> bool {
    TRANSIENT_NETWORK_MESSAGES.contains(&message)
}

/// Outcome of classifying a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Schedule another attempt.
    Retryable,
    /// Stop retrying and surface the failure as-is.
    Fatal,
    /// Stop retrying and surface the wrapped original failure.
    Aborted,
}

/// Classify a failure.
///
/// Rules, in priority order:
/// 1. An abort stops the session unconditionally.
/// 2. A [`Failure::Type`] whose message is not a known transient network
///    signature is fatal.
/// 3. A [`Failure::Type`] with a transient network message is retryable.
/// 4. Any other structured failure is retryable.
pub fn classify(failure: &Failure) -> Classification {
    match failure {
        Failure::Abort(_) => Classification::Aborted,
        Failure::Type { message } if !is_transient_network_message(message) => {
            Classification::Fatal
        }
        Failure::Type { .. } | Failure::Other { .. } => Classification::Retryable,
    }
}

/// Whether the failure should schedule another attempt.
pub fn is_retryable(failure: &Failure) -> bool {
    classify(failure) == Classification::Retryable
}
