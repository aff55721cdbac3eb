//! Measuring the time of operations

use std::time::{Duration, Instant};

/// Logs the time elapsed between creating and dropping it.
pub struct MeasureTime {
    start: Instant,
    operation: &'static str,
}

impl MeasureTime {
    pub fn new() -> Self {
        Self::named("Processing")
    }

    pub fn named(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Default for MeasureTime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MeasureTime {
    fn drop(&mut self) {
        // truncate to milliseconds, good enough
        let elapsed = self.start.elapsed();
        let elapsed = Duration::from_millis(elapsed.as_millis().try_into().unwrap_or(u64::MAX));
        log::info!(
            "{} took {}",
            self.operation,
            humantime::format_duration(elapsed)
        );
    }
}
