// Error types for the retry engine
use thiserror::Error;

/// A structured failure raised by a retried operation.
///
/// The variant tag drives classification (see [`crate::classify`]): an
/// [`Abort`](Failure::Abort) stops the session unconditionally, a
/// [`Type`](Failure::Type) failure is fatal unless its message matches a known
/// transient network signature, and any [`Other`](Failure::Other) failure is
/// retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    /// Contract-violation kind of failure, analogous to calling a method on a
    /// value of the wrong type. Fatal unless the message is one of
    /// [`crate::classify::TRANSIENT_NETWORK_MESSAGES`].
    #[error("{message}")]
    Type {
        /// Human-readable description of the failure.
        message: String,
    },

    /// Any other structured failure. Always retryable.
    #[error("{message}")]
    Other {
        /// Human-readable description of the failure.
        message: String,
    },

    /// Explicit request to stop retrying, wrapping the original failure.
    #[error("{0}")]
    Abort(AbortError),
}

impl Failure {
    /// Create a contract-violation kind of failure.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type { message: message.into() }
    }

    /// Create a generic retryable failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other { message: message.into() }
    }

    /// Create an abort failure from a descriptive message.
    pub fn abort(message: impl Into<String>) -> Self {
        Self::Abort(AbortError::new(message))
    }

    /// Create an abort failure wrapping an existing failure unchanged.
    pub fn abort_with(original: Failure) -> Self {
        Self::Abort(AbortError::from_failure(original))
    }

    /// The failure message. For aborts this is the wrapped original's message.
    pub fn message(&self) -> &str {
        match self {
            Self::Type { message } | Self::Other { message } => message,
            Self::Abort(abort) => abort.message(),
        }
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::other(message)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::other(message)
    }
}

/// Signals that retrying must stop immediately, surfacing the wrapped
/// original failure to the caller.
///
/// A message string is wrapped in a generic failure; an existing [`Failure`]
/// is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .original.message())]
pub struct AbortError {
    original: Box<Failure>,
}

impl AbortError {
    /// Wrap a descriptive message in a generic failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self { original: Box::new(Failure::other(message)) }
    }

    /// Wrap an existing failure unchanged.
    pub fn from_failure(original: Failure) -> Self {
        Self { original: Box::new(original) }
    }

    /// Message copied from the wrapped original failure.
    pub fn message(&self) -> &str {
        self.original.message()
    }

    /// The wrapped original failure.
    pub fn original(&self) -> &Failure {
        &self.original
    }

    /// Consume the wrapper and return the original failure.
    pub fn into_original(self) -> Failure {
        *self.original
    }
}

/// One failed attempt, handed to the failure observer.
///
/// Carries the triggering failure's message together with the 1-based attempt
/// number and the number of retries remaining in the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AttemptError {
    message: String,
    attempt_number: u32,
    retries_left: u32,
}

impl AttemptError {
    /// Decorate a failure with attempt bookkeeping.
    pub fn new(failure: &Failure, attempt_number: u32, retries_left: u32) -> Self {
        Self { message: failure.message().to_string(), attempt_number, retries_left }
    }

    /// Message copied from the triggering failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based number of the attempt that failed.
    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    /// Retries remaining after this attempt. Monotonically decreasing across
    /// the session.
    pub fn retries_left(&self) -> u32 {
        self.retries_left
    }
}

/// Terminal error surfaced by the retry engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// The retry configuration is invalid. Raised synchronously before any
    /// attempt is made.
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration {
        /// Description of the configuration violation.
        message: String,
    },

    /// Terminal failure of the retry session: the fatal failure itself, the
    /// unwrapped abort original, the observer's failure, or the
    /// representative failure computed on exhaustion.
    #[error(transparent)]
    Failure(#[from] Failure),
}

impl RetryError {
    /// Create a configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration { message: message.into() }
    }

    /// The terminal failure, if this is not a configuration error.
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            Self::InvalidConfiguration { .. } => None,
        }
    }
}

/// Result type for retry operations.
pub type RetryResult<T> = Result<T, RetryError>;
