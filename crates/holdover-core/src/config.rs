//! Progress task configuration.
//!
//! These are pure domain types with no infrastructure dependencies. Adapters
//! may override the defaults (CLI flags, environment) but the presenter only
//! ever sees a validated [`ProgressConfig`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of ticks emitted by one progress run.
pub const DEFAULT_TOTAL_TICKS: u32 = 100;

/// Default spacing between two ticks, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Configuration of the periodic progress task started by the trigger action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProgressConfig {
    /// Number of ticks in one run. The displayed progress ends at this value.
    pub total_ticks: u32,

    /// Interval between ticks, in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ProgressConfig {
    /// Create a config with the stock tick count and interval.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            total_ticks: DEFAULT_TOTAL_TICKS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }

    /// Create a config with explicit values. Call [`validate`](Self::validate)
    /// before handing it to a presenter.
    #[must_use]
    pub const fn new(total_ticks: u32, tick_interval_ms: u64) -> Self {
        Self {
            total_ticks,
            tick_interval_ms,
        }
    }

    /// Interval between ticks as a [`Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check the config describes a run that can actually make progress.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.total_ticks == 0 {
            return Err(ConfigError::ZeroTicks);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
