//! Simulation facade: one tick drives clock, chemistry, finance and particles

use glam::Vec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

use crate::clock::{ElapsedTime, TimeScaler};
use crate::config::SimConfig;
use crate::error::ValidationError;
use crate::inputs::ControlInputs;
use crate::ledger::{FinancialLedger, WindowMetrics};
use crate::particles::{ParticleSystem, ParticleView};
use crate::reaction::{MassFlow, ReactionAccumulator};
use crate::rng::SimRng;

/// Masses produced by a single tick
pub type TickResult = MassFlow;

/// Serializable summary of everything the reporting layer shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub elapsed: ElapsedTime,
    pub simulated_days: f64,
    pub ph: f64,
    pub total_fluoride_in_kg: f64,
    pub total_fluorite_out_kg: f64,
    pub total_reagent_used_kg: f64,
    pub total_revenue: f64,
    pub total_variable_cost: f64,
    pub total_fixed_cost: f64,
    pub total_savings: f64,
    pub net_profit: f64,
    pub window_days: u32,
    pub window: WindowMetrics,
    pub roi_percent: f64,
    pub payback_years: Option<f64>,
    pub history_len: usize,
    pub particle_count: usize,
}

/// Engine instance; independent instances share nothing
pub struct Simulation<R: SimRng = Xoshiro256StarStar> {
    config: SimConfig,
    clock: TimeScaler,
    reactor: ReactionAccumulator,
    ledger: FinancialLedger,
    particles: ParticleSystem,
    bed_center: Vec2,
    rng: R,
}

impl Simulation<Xoshiro256StarStar> {
    /// Engine with a seeded xoshiro generator
    pub fn with_seed(config: SimConfig, seed: u64) -> Result<Self, ValidationError> {
        Self::new(config, Xoshiro256StarStar::seed_from_u64(seed))
    }
}

impl<R: SimRng> Simulation<R> {
    pub fn new(config: SimConfig, rng: R) -> Result<Self, ValidationError> {
        config.validate()?;

        Ok(Self {
            clock: TimeScaler::new(&config.clock),
            reactor: ReactionAccumulator::new(&config.chemistry),
            ledger: FinancialLedger::new(&config.market, &config.finance),
            particles: ParticleSystem::new(&config.particles),
            bed_center: config.particles.bed_center,
            config,
            rng,
        })
    }

    /// Swap the configuration bundle; accumulated state is kept
    pub fn configure(&mut self, config: SimConfig) -> Result<(), ValidationError> {
        config.validate()?;

        self.clock.reconfigure(&config.clock);
        self.reactor.reconfigure(&config.chemistry);
        self.ledger
            .reconfigure(&config.market, &config.finance, self.clock.simulated_days());
        self.particles.reconfigure(&config.particles);
        self.config = config;
        log::info!("Simulation reconfigured");
        Ok(())
    }

    /// Return every component to its initial state
    pub fn reset(&mut self) {
        self.clock.reset();
        self.reactor.reset();
        self.ledger.reset();
        self.particles.clear();
        log::info!("Simulation reset");
    }

    /// Bed center supplied by the host's vessel geometry
    pub fn set_bed_center(&mut self, center: Vec2) {
        self.bed_center = center;
    }

    /// Advance one frame.
    ///
    /// While `inputs.running` is false, or for a non-positive delta, nothing
    /// changes and zero masses are returned.
    pub fn tick(&mut self, real_delta_ms: f64, inputs: &ControlInputs) -> TickResult {
        if !inputs.running {
            return TickResult::default();
        }

        let step = self.clock.advance(real_delta_ms, inputs.speed_multiplier);
        if step.sim_seconds <= 0.0 {
            return TickResult::default();
        }

        let flow = self.reactor.step(
            inputs.flow_rate,
            inputs.fluoride_concentration,
            step.sim_seconds,
            &mut self.rng,
        );

        let days = self.clock.simulated_days();
        self.ledger.accrue(&flow, inputs.purity_mix, days);
        self.ledger.refresh_window(days);

        self.particles.update(
            real_delta_ms,
            inputs.speed_multiplier as f32,
            inputs.flow_rate as f32,
            self.bed_center,
            &mut self.rng,
        );

        log::trace!(
            "tick {:.1}ms -> {:.0}s simulated, F in {:.4} kg, pH {:.3}, {} particles",
            real_delta_ms,
            step.sim_seconds,
            flow.fluoride_in,
            self.reactor.ph(),
            self.particles.count()
        );

        flow
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &TimeScaler {
        &self.clock
    }

    pub fn reactor(&self) -> &ReactionAccumulator {
        &self.reactor
    }

    pub fn ledger(&self) -> &FinancialLedger {
        &self.ledger
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn bed_center(&self) -> Vec2 {
        self.bed_center
    }

    pub fn current_ph(&self) -> f64 {
        self.reactor.ph()
    }

    pub fn window_metrics(&self) -> WindowMetrics {
        self.ledger.window_metrics()
    }

    pub fn roi_percent(&self) -> f64 {
        self.ledger.roi_percent()
    }

    pub fn payback_years(&self) -> Option<f64> {
        self.ledger.payback_years()
    }

    pub fn elapsed(&self) -> ElapsedTime {
        self.clock.elapsed()
    }

    pub fn particle_views(&self) -> impl Iterator<Item = ParticleView> + '_ {
        self.particles.views()
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            elapsed: self.clock.elapsed(),
            simulated_days: self.clock.simulated_days(),
            ph: self.reactor.ph(),
            total_fluoride_in_kg: self.reactor.total_fluoride_in(),
            total_fluorite_out_kg: self.reactor.total_fluorite_out(),
            total_reagent_used_kg: self.reactor.total_reagent_used(),
            total_revenue: self.ledger.total_revenue(),
            total_variable_cost: self.ledger.total_variable_cost(),
            total_fixed_cost: self.ledger.total_fixed_cost(),
            total_savings: self.ledger.total_savings(),
            net_profit: self.ledger.net_profit(),
            window_days: self.config.finance.window_days,
            window: self.ledger.window_metrics(),
            roi_percent: self.ledger.roi_percent(),
            payback_years: self.ledger.payback_years(),
            history_len: self.ledger.history().len(),
            particle_count: self.particles.count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::test_support::MidpointRng;

    fn quiet_sim() -> Simulation<MidpointRng> {
        Simulation::new(SimConfig::default(), MidpointRng).expect("valid config")
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.finance.capex = 0.0;
        assert!(Simulation::new(config, MidpointRng).is_err());
    }

    #[test]
    fn test_paused_tick_is_frozen() {
        let mut sim = quiet_sim();
        let inputs = ControlInputs::default();
        sim.tick(1000.0, &inputs);
        let before = sim.report();

        let paused = ControlInputs {
            running: false,
            ..inputs
        };
        for _ in 0..10 {
            assert_eq!(sim.tick(1000.0, &paused), TickResult::default());
        }

        assert_eq!(sim.report(), before);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut sim = quiet_sim();
        let before = sim.report();
        assert_eq!(sim.tick(0.0, &ControlInputs::default()), TickResult::default());
        assert_eq!(sim.report(), before);
    }

    #[test]
    fn test_tick_golden_masses() {
        let mut sim = quiet_sim();
        // 250 ms at speed 1 covers one simulated hour
        let flow = sim.tick(250.0, &ControlInputs::default());

        assert!((flow.fluoride_in - 22.5).abs() < 1e-9);
        assert!((flow.fluorite_out - 22.5 * 2.0547).abs() < 1e-9);
        assert!((flow.reagent_used - 22.5 * 1.95).abs() < 1e-9);
    }

    #[test]
    fn test_reconfigure_keeps_totals() {
        let mut sim = quiet_sim();
        sim.tick(1000.0, &ControlInputs::default());
        let revenue = sim.ledger().total_revenue();

        let mut config = SimConfig::default();
        config.market.high_purity_price = 900.0;
        sim.configure(config).expect("valid");

        assert_eq!(sim.ledger().total_revenue(), revenue);
        assert_eq!(sim.config().market.high_purity_price, 900.0);
    }

    #[test]
    fn test_ratio_change_never_lowers_totals() {
        let mut sim = quiet_sim();
        for _ in 0..10 {
            sim.tick(1000.0, &ControlInputs::default());
        }
        let before = sim.report();

        let mut config = SimConfig::default();
        config.chemistry.fluorite_per_fluoride = 1.0;
        config.chemistry.reagent_per_fluoride = 1.0;
        sim.configure(config).expect("valid");
        sim.tick(16.0, &ControlInputs::default());

        let after = sim.report();
        assert!(after.total_fluorite_out_kg >= before.total_fluorite_out_kg);
        assert!(after.total_reagent_used_kg >= before.total_reagent_used_kg);
        assert!(after.total_fixed_cost >= before.total_fixed_cost);
    }

    #[test]
    fn test_window_change_applies_while_paused() {
        let mut sim = quiet_sim();
        let inputs = ControlInputs::default();
        // 6000 ms at speed 1 is one simulated day
        for _ in 0..60 {
            sim.tick(6000.0, &inputs);
        }
        let monthly = sim.window_metrics();

        let mut config = SimConfig::default();
        config.finance.window_days = 7;
        sim.configure(config).expect("valid");

        let paused = ControlInputs {
            running: false,
            ..inputs
        };
        sim.tick(16.0, &paused);

        let report = sim.report();
        assert_eq!(report.window_days, 7);
        assert!((report.window.profit - monthly.profit * 7.0 / 30.0).abs() < 1e-6);
        let capex = sim.config().finance.capex;
        let expected = crate::ledger::roi_percent(report.window.profit, 7, capex);
        assert!((report.roi_percent - expected).abs() < 1e-9);
        assert!((sim.roi_percent() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_set_bed_center_moves_inlet() {
        let mut config = SimConfig::default();
        config.particles.spawn_base_rate = 1.0;
        let mut sim = Simulation::new(config, MidpointRng).expect("valid");
        sim.set_bed_center(Vec2::new(0.0, 0.0));

        sim.tick(16.0, &ControlInputs::default());
        let view = sim.particle_views().next().expect("spawned");
        assert_eq!(view.position, Vec2::new(0.0, 180.0));
    }
}
