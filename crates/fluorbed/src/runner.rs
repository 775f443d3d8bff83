//! Fixed-step headless run loop

use anyhow::{Context, Result};
use fluorbed_core::{ControlInputs, SimConfig, Simulation};
use std::time::Instant;

use crate::report::{PerformanceMetrics, RunReport};

/// How long and how finely to drive the engine
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Number of frames to simulate
    pub ticks: u64,

    /// Real-time frame delta fed to every tick (milliseconds)
    pub frame_ms: f64,

    /// RNG seed; a random one is drawn and logged when absent
    pub seed: Option<u64>,

    /// Log a progress line every N ticks (0 disables)
    pub log_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            // 30 simulated days at speed 1
            ticks: 11_250,
            frame_ms: 16.0,
            seed: None,
            log_every: 1_800,
        }
    }
}

/// Drive a fresh engine for `options.ticks` frames with constant controls
pub fn run(config: SimConfig, inputs: ControlInputs, options: &RunOptions) -> Result<RunReport> {
    inputs.validate().context("Invalid control inputs")?;

    let seed = options.seed.unwrap_or_else(rand::random::<u64>);
    log::info!(
        "Running {} ticks of {}ms (seed {})",
        options.ticks,
        options.frame_ms,
        seed
    );

    let mut sim = Simulation::with_seed(config, seed).context("Failed to create simulation")?;

    let start = Instant::now();
    let mut peak_ms: f64 = 0.0;

    for tick in 1..=options.ticks {
        let tick_start = Instant::now();
        sim.tick(options.frame_ms, &inputs);
        peak_ms = peak_ms.max(tick_start.elapsed().as_secs_f64() * 1000.0);

        if options.log_every > 0 && tick % options.log_every == 0 {
            let report = sim.report();
            log::info!(
                "tick {}/{}: {} | pH {:.2} | profit {:.0} | {} particles",
                tick,
                options.ticks,
                report.elapsed,
                report.ph,
                report.net_profit,
                report.particle_count
            );
        }
    }

    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    let history = sim.ledger().history().iter().copied().collect();
    let mut report = RunReport::new(
        seed,
        options.ticks,
        options.frame_ms,
        inputs,
        sim.report(),
        history,
    );
    report.performance = PerformanceMetrics {
        total_duration_ms: total_ms,
        avg_tick_time_ms: if options.ticks > 0 {
            total_ms / options.ticks as f64
        } else {
            0.0
        },
        peak_tick_time_ms: peak_ms,
    };

    log::info!("{}", report.headline());
    log::info!("{}", report.performance.summary());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(ticks: u64) -> RunOptions {
        RunOptions {
            ticks,
            frame_ms: 250.0,
            seed: Some(42),
            log_every: 0,
        }
    }

    #[test]
    fn test_run_accumulates_mass() {
        // 24 ticks of 250 ms at speed 1 is one simulated day
        let report = run(SimConfig::default(), ControlInputs::default(), &options(24))
            .expect("run succeeds");

        assert_eq!(report.seed, 42);
        assert_eq!(report.ticks, 24);
        assert!((report.summary.simulated_days - 1.0).abs() < 1e-9);
        assert!((report.summary.total_fluoride_in_kg - 540.0).abs() < 1e-6);
        assert_eq!(report.history.len(), 1);
        assert_eq!(report.history[0].day, 1);
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = run(SimConfig::default(), ControlInputs::default(), &options(100)).expect("run");
        let b = run(SimConfig::default(), ControlInputs::default(), &options(100)).expect("run");
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn test_invalid_inputs_fail_fast() {
        let inputs = ControlInputs {
            purity_mix: 140.0,
            ..ControlInputs::default()
        };
        assert!(run(SimConfig::default(), inputs, &options(10)).is_err());
    }

    #[test]
    fn test_zero_ticks() {
        let report = run(SimConfig::default(), ControlInputs::default(), &options(0)).expect("run");
        assert_eq!(report.summary.total_fluoride_in_kg, 0.0);
        assert_eq!(report.performance.avg_tick_time_ms, 0.0);
    }
}
