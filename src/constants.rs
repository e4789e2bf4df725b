// Constants for retry configuration and schedule generation
use std::time::Duration;

/// Default number of retries for the engine configuration.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default exponential growth factor for the engine configuration.
pub const DEFAULT_FACTOR: f64 = 2.0;

/// Default minimum delay before the first retry.
pub const DEFAULT_MIN_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default maximum delay cap (unbounded).
pub const DEFAULT_MAX_TIMEOUT: Duration = Duration::MAX;

/// Default number of entries produced by a standalone schedule.
///
/// Intentionally different from [`DEFAULT_RETRIES`]: the engine always passes
/// an explicit count, so this default is only observable when a schedule is
/// generated on its own.
pub const DEFAULT_SCHEDULE_RETRIES: u32 = 5;

/// Default minimum delay for a standalone schedule.
pub const DEFAULT_SCHEDULE_MIN_TIMEOUT: Duration = Duration::from_millis(10);

/// Default growth factor for a standalone schedule.
pub const DEFAULT_SCHEDULE_FACTOR: f64 = 6.0;

/// Effective floor applied to the minimum delay during schedule generation.
pub const MIN_TIMEOUT_FLOOR: Duration = Duration::from_millis(1);

/// Message of the synthetic failure recorded when the retry time budget
/// expires.
pub const MAX_RETRY_TIME_MESSAGE: &str = "Maximum retry timeout reached";

/// Message of the failure surfaced when the engine's cancellation token fires.
pub const CANCELLED_MESSAGE: &str = "Retry was cancelled";
