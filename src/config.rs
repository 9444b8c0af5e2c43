//! Planner configuration.
//!
//! The planner has no notion of "now": the horizon start every machine
//! cursor begins at, and the daily capacity used for utilization, are
//! supplied by the caller.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default daily work window: two 8-hour shifts.
pub const DEFAULT_WORK_WINDOW_MINUTES: u32 = 960;

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Instant every machine becomes available for new work.
    pub horizon_start: NaiveDateTime,
    /// Daily machine capacity (minutes), the utilization denominator.
    #[serde(default = "default_work_window")]
    pub work_window_minutes: u32,
}

fn default_work_window() -> u32 {
    DEFAULT_WORK_WINDOW_MINUTES
}

impl PlannerConfig {
    /// Creates a config with the default work window.
    pub fn new(horizon_start: NaiveDateTime) -> Self {
        Self {
            horizon_start,
            work_window_minutes: DEFAULT_WORK_WINDOW_MINUTES,
        }
    }

    /// Sets the daily work window.
    pub fn with_work_window_minutes(mut self, minutes: u32) -> Self {
        self.work_window_minutes = minutes;
        self
    }

    /// Parses and validates a JSON config document.
    ///
    /// ```
    /// use u_planboard::config::PlannerConfig;
    ///
    /// let cfg = PlannerConfig::from_json_str(r#"{"horizon_start": "2025-10-01T08:00:00"}"#).unwrap();
    /// assert_eq!(cfg.work_window_minutes, 960);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_window_minutes == 0 {
            return Err(ConfigError::InvalidWorkWindow(self.work_window_minutes));
        }
        Ok(())
    }
}
