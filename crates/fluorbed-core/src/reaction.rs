//! Fluoride precipitation mass balance: F⁻ + Ca²⁺ → CaF₂
//!
//! Masses are integrated over each simulated interval. Product and reagent
//! masses follow from the fluoride mass through stoichiometric ratios and
//! are accumulated per step, so a ratio change only affects later steps.

use serde::{Deserialize, Serialize};

use crate::clock::SECONDS_PER_DAY;
use crate::config::ChemistryConfig;
use crate::rng::SimRng;

/// Incremental masses for one step, in kg
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MassFlow {
    pub fluoride_in: f64,
    pub fluorite_out: f64,
    pub reagent_used: f64,
}

/// Running reaction totals plus the relaxing pH signal
#[derive(Debug, Clone)]
pub struct ReactionAccumulator {
    config: ChemistryConfig,
    ph: f64,
    total_fluoride_in: f64,
    total_fluorite_out: f64,
    total_reagent_used: f64,
}

impl ReactionAccumulator {
    pub fn new(config: &ChemistryConfig) -> Self {
        Self {
            config: config.clone(),
            ph: config.initial_ph,
            total_fluoride_in: 0.0,
            total_fluorite_out: 0.0,
            total_reagent_used: 0.0,
        }
    }

    /// Swap chemistry constants; totals and pH are kept
    pub fn reconfigure(&mut self, config: &ChemistryConfig) {
        self.config = config.clone();
    }

    /// Fluoride mass delivered over `sim_seconds` at the given flow and concentration
    pub fn fluoride_mass(&self, flow_rate: f64, concentration: f64, sim_seconds: f64) -> f64 {
        flow_rate * concentration / self.config.mass_normalization * sim_seconds
    }

    /// Fluoride load in kg per simulated day
    pub fn daily_fluoride_load(&self, flow_rate: f64, concentration: f64) -> f64 {
        self.fluoride_mass(flow_rate, concentration, SECONDS_PER_DAY)
    }

    /// Integrate one interval and relax the pH signal by one step
    ///
    /// Inputs are not validated; negative flow or concentration yields
    /// negative masses.
    pub fn step<R: SimRng + ?Sized>(
        &mut self,
        flow_rate: f64,
        concentration: f64,
        sim_seconds: f64,
        rng: &mut R,
    ) -> MassFlow {
        let fluoride_in = self.fluoride_mass(flow_rate, concentration, sim_seconds);
        let flow = MassFlow {
            fluoride_in,
            fluorite_out: fluoride_in * self.config.fluorite_per_fluoride,
            reagent_used: fluoride_in * self.config.reagent_per_fluoride,
        };

        self.total_fluoride_in += flow.fluoride_in;
        self.total_fluorite_out += flow.fluorite_out;
        self.total_reagent_used += flow.reagent_used;

        self.relax_ph(rng);
        flow
    }

    fn relax_ph<R: SimRng + ?Sized>(&mut self, rng: &mut R) {
        let noise = f64::from(rng.gen_signed(1.0)) * self.config.ph_noise;
        self.ph += (self.config.target_ph - self.ph) * self.config.ph_relaxation + noise;
    }

    pub fn ph(&self) -> f64 {
        self.ph
    }

    pub fn total_fluoride_in(&self) -> f64 {
        self.total_fluoride_in
    }

    pub fn total_fluorite_out(&self) -> f64 {
        self.total_fluorite_out
    }

    pub fn total_reagent_used(&self) -> f64 {
        self.total_reagent_used
    }

    pub fn reset(&mut self) {
        self.ph = self.config.initial_ph;
        self.total_fluoride_in = 0.0;
        self.total_fluorite_out = 0.0;
        self.total_reagent_used = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::test_support::MidpointRng;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn accumulator() -> ReactionAccumulator {
        ReactionAccumulator::new(&ChemistryConfig::default())
    }

    #[test]
    fn test_golden_masses_for_one_hour() {
        let mut reactor = accumulator();
        // 450 m³/h at 50 mg/L carries 22.5 kg of fluoride per hour
        let flow = reactor.step(450.0, 50.0, 3600.0, &mut MidpointRng);

        assert!((flow.fluoride_in - 22.5).abs() < 1e-12);
        assert!((flow.fluorite_out - 22.5 * 2.0547).abs() < 1e-9);
        assert!((flow.reagent_used - 22.5 * 1.95).abs() < 1e-9);
    }

    #[test]
    fn test_totals_keep_stoichiometric_ratio() {
        let mut reactor = accumulator();
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);

        for i in 0..50 {
            reactor.step(300.0 + i as f64, 40.0, 240.0, &mut rng);
        }

        let config = ChemistryConfig::default();
        let fluoride = reactor.total_fluoride_in();
        assert!(
            (reactor.total_fluorite_out() - fluoride * config.fluorite_per_fluoride).abs()
                <= fluoride * 1e-12
        );
        assert!(
            (reactor.total_reagent_used() - fluoride * config.reagent_per_fluoride).abs()
                <= fluoride * 1e-12
        );
    }

    #[test]
    fn test_ratio_change_keeps_earlier_mass() {
        let mut reactor = accumulator();
        reactor.step(450.0, 50.0, 3600.0, &mut MidpointRng);
        let fluorite = reactor.total_fluorite_out();
        let reagent = reactor.total_reagent_used();

        let config = ChemistryConfig {
            fluorite_per_fluoride: 1.0,
            reagent_per_fluoride: 1.0,
            ..ChemistryConfig::default()
        };
        reactor.reconfigure(&config);
        reactor.step(450.0, 50.0, 3600.0, &mut MidpointRng);

        // The first hour stays booked at the old ratios
        assert!((reactor.total_fluorite_out() - (fluorite + 22.5)).abs() < 1e-9);
        assert!((reactor.total_reagent_used() - (reagent + 22.5)).abs() < 1e-9);
        assert!((reactor.total_fluoride_in() - 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_totals_non_decreasing() {
        let mut reactor = accumulator();
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let mut last = (0.0, 0.0, 0.0);

        for _ in 0..100 {
            reactor.step(450.0, 50.0, 960.0, &mut rng);
            let now = (
                reactor.total_fluoride_in(),
                reactor.total_fluorite_out(),
                reactor.total_reagent_used(),
            );
            assert!(now.0 >= last.0 && now.1 >= last.1 && now.2 >= last.2);
            last = now;
        }
    }

    #[test]
    fn test_ph_converges_without_overshoot() {
        let mut reactor = accumulator();
        let target = ChemistryConfig::default().target_ph;
        let mut gap = target - reactor.ph();

        for _ in 0..200 {
            reactor.step(450.0, 50.0, 60.0, &mut MidpointRng);
            let new_gap = target - reactor.ph();
            assert!(new_gap >= 0.0, "pH overshot the target");
            assert!(new_gap < gap);
            assert!((new_gap - gap * 0.9).abs() < 1e-12);
            gap = new_gap;
        }

        assert!(gap < 1e-6);
    }

    #[test]
    fn test_ph_noise_is_bounded() {
        let mut reactor = accumulator();
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);

        for _ in 0..100 {
            let before = reactor.ph();
            reactor.step(450.0, 50.0, 60.0, &mut rng);
            let relaxed = before + (7.5 - before) * 0.1;
            assert!((reactor.ph() - relaxed).abs() <= 0.01 + 1e-12);
        }
    }

    #[test]
    fn test_daily_load() {
        let reactor = accumulator();
        assert!((reactor.daily_fluoride_load(450.0, 50.0) - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut reactor = accumulator();
        reactor.step(450.0, 50.0, 3600.0, &mut MidpointRng);
        reactor.reset();

        assert_eq!(reactor.ph(), 7.0);
        assert_eq!(reactor.total_fluoride_in(), 0.0);
        assert_eq!(reactor.total_fluorite_out(), 0.0);
        assert_eq!(reactor.total_reagent_used(), 0.0);
    }
}
