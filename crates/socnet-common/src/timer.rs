//! Wall-clock timing for user-facing operations

use std::time::{Duration, Instant};
use tracing::info;

/// Measures how long an operation takes
///
/// ```
/// use socnet_common::Timer;
///
/// let timer = Timer::start("load users");
/// // ... work ...
/// let elapsed = timer.stop();
/// assert!(elapsed.as_secs() < 60);
/// ```
#[derive(Debug)]
pub struct Timer {
    operation: String,
    started: Instant,
}

impl Timer {
    pub fn start(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Stop the timer and log the performance time
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            operation = %self.operation,
            elapsed_secs = elapsed.as_secs_f64(),
            "Performance time: {} second(s)",
            format_seconds(elapsed)
        );
        elapsed
    }
}

/// Render a duration as fractional seconds with millisecond precision
pub fn format_seconds(elapsed: Duration) -> String {
    format!("{:.3}", elapsed.as_secs_f64())
}
