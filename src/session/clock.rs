//! Wall-clock abstraction for timestamping, allowing mock time in tests.
//!
//! Emitted segment timestamps are Unix epoch seconds, so the clock deals in
//! `SystemTime` rather than `Instant`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for time operations, allowing mock time in tests.
pub trait Clock: Send + Sync {
    /// Returns the current wall-clock time.
    fn now(&self) -> SystemTime;
}

/// Real system clock using `SystemTime::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Converts a wall-clock time to Unix epoch seconds as floating point.
///
/// Times before the epoch clamp to 0.0; they cannot occur for timestamps
/// taken while the process runs.
pub fn epoch_secs(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
