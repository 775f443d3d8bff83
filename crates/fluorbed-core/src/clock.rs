//! Real-time to process-time scaling

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ClockConfig;

pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const SECONDS_PER_DAY: f64 = 24.0 * SECONDS_PER_HOUR;
/// Reporting month length used by the elapsed-time breakdown
pub const DAYS_PER_MONTH: u64 = 30;

/// Output of one clock advance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockStep {
    /// Real delta multiplied by the speed multiplier
    pub effective_elapsed_ms: f64,
    /// Simulated process seconds covered by this step
    pub sim_seconds: f64,
}

/// Accumulates simulated time from scaled real-time deltas
#[derive(Debug, Clone)]
pub struct TimeScaler {
    sim_seconds_per_scaled_second: f64,
    total_sim_seconds: f64,
}

impl TimeScaler {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            sim_seconds_per_scaled_second: config.sim_seconds_per_scaled_second,
            total_sim_seconds: 0.0,
        }
    }

    /// Swap the expansion factor; accumulated time is kept
    pub fn reconfigure(&mut self, config: &ClockConfig) {
        self.sim_seconds_per_scaled_second = config.sim_seconds_per_scaled_second;
    }

    /// Advance by a real delta. Non-positive or non-finite input is a no-op.
    pub fn advance(&mut self, real_delta_ms: f64, speed: f64) -> ClockStep {
        let effective_elapsed_ms = real_delta_ms * speed;
        if !effective_elapsed_ms.is_finite() || effective_elapsed_ms <= 0.0 {
            return ClockStep::default();
        }

        let sim_seconds = effective_elapsed_ms / 1000.0 * self.sim_seconds_per_scaled_second;
        self.total_sim_seconds += sim_seconds;

        ClockStep {
            effective_elapsed_ms,
            sim_seconds,
        }
    }

    pub fn simulated_seconds(&self) -> f64 {
        self.total_sim_seconds
    }

    /// Fractional simulated days elapsed
    pub fn simulated_days(&self) -> f64 {
        self.total_sim_seconds / SECONDS_PER_DAY
    }

    pub fn elapsed(&self) -> ElapsedTime {
        ElapsedTime::from_seconds(self.total_sim_seconds)
    }

    pub fn reset(&mut self) {
        self.total_sim_seconds = 0.0;
    }
}

/// Human-oriented breakdown of simulated time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ElapsedTime {
    /// Under one simulated day
    Hours(f64),
    /// One day or more, in 30-day months plus remaining days
    MonthsDays { months: u64, days: u64 },
}

impl ElapsedTime {
    pub fn from_seconds(seconds: f64) -> Self {
        let total_days = (seconds / SECONDS_PER_DAY).floor();
        if total_days < 1.0 {
            return Self::Hours(seconds.max(0.0) / SECONDS_PER_HOUR);
        }

        let total_days = total_days as u64;
        Self::MonthsDays {
            months: total_days / DAYS_PER_MONTH,
            days: total_days % DAYS_PER_MONTH,
        }
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Hours(hours) => write!(f, "{hours:.1}h"),
            Self::MonthsDays { months: 0, days } => write!(f, "{days}d"),
            Self::MonthsDays { months, days } => write!(f, "{months}mo {days}d"),
        }
    }
}
