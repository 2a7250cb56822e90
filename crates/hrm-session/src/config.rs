//! Protocol tunables.

use std::time::Duration;

/// Tunables for the test protocol.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Length of the baseline recording window (default: 5 s).
    pub baseline_window: Duration,
    /// Minimum interval between accepted samples (default: 1000 ms).
    ///
    /// Modern links rarely need throttling, but older radio stacks deliver
    /// notifications far faster than the sensor actually measures.
    pub min_sample_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            baseline_window: Duration::from_secs(5),
            min_sample_interval: Duration::from_millis(1000),
        }
    }
}
