//! Run reports written after a headless session

use anyhow::{Context, Result};
use fluorbed_core::{ControlInputs, DailySnapshot, SimulationReport};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Wall-clock cost of the run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Total wall-clock time (milliseconds)
    pub total_duration_ms: f64,

    /// Average time per tick (milliseconds)
    pub avg_tick_time_ms: f64,

    /// Peak tick time (milliseconds)
    pub peak_tick_time_ms: f64,
}

impl PerformanceMetrics {
    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.1}ms | Avg tick: {:.4}ms | Peak: {:.4}ms",
            self.total_duration_ms, self.avg_tick_time_ms, self.peak_tick_time_ms
        )
    }
}

/// Everything needed to reproduce and review a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Seed of the simulation RNG
    pub seed: u64,

    pub ticks: u64,
    pub frame_ms: f64,
    pub inputs: ControlInputs,
    pub summary: SimulationReport,

    /// Retained daily snapshots, oldest first
    pub history: Vec<DailySnapshot>,

    pub performance: PerformanceMetrics,
}

impl RunReport {
    pub fn new(
        seed: u64,
        ticks: u64,
        frame_ms: f64,
        inputs: ControlInputs,
        summary: SimulationReport,
        history: Vec<DailySnapshot>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            seed,
            ticks,
            frame_ms,
            inputs,
            summary,
            history,
            performance: PerformanceMetrics::default(),
        }
    }

    /// One-line digest for the log
    pub fn headline(&self) -> String {
        let s = &self.summary;
        format!(
            "{} elapsed | pH {:.2} | CaF2 {:.1} kg | profit {:.0} | {}d window profit {:.0} | ROI {:.1}%",
            s.elapsed, s.ph, s.total_fluorite_out_kg, s.net_profit, s.window_days, s.window.profit, s.roi_percent
        )
    }

    /// Save report to JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize run report to JSON")?;

        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        std::fs::write(path.as_ref(), json).with_context(|| {
            format!("Failed to write run report: {}", path.as_ref().display())
        })?;

        log::info!("Saved run report to {}", path.as_ref().display());
        Ok(())
    }
}
