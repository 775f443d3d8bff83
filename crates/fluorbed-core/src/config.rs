//! Process constants bundle
//!
//! Every constant the engine uses lives here and is fixed for the lifetime of
//! a configuration. Units: mass in kg, money in USD, one ton is 1000 kg,
//! flow in m³/h, concentration in mg/L.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError, ensure_in_range, ensure_non_negative, ensure_positive};

/// History entries needed before the rolling window stops extrapolating
pub const MIN_WINDOW_HISTORY: usize = 3;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub clock: ClockConfig,

    #[serde(default)]
    pub chemistry: ChemistryConfig,

    #[serde(default)]
    pub market: MarketConfig,

    #[serde(default)]
    pub finance: FinanceConfig,

    #[serde(default)]
    pub particles: ParticleConfig,
}

/// Real-to-simulated time mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Simulated seconds per (real second × speed multiplier)
    pub sim_seconds_per_scaled_second: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            // 4 simulated hours
            sim_seconds_per_scaled_second: 4.0 * 3600.0,
        }
    }
}

/// Stoichiometry and pH relaxation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemistryConfig {
    /// Divides flow × concentration to get kg/s (m³/h · mg/L → kg/s)
    pub mass_normalization: f64,
    /// kg CaF₂ produced per kg fluoride removed
    pub fluorite_per_fluoride: f64,
    /// kg Ca(OH)₂ consumed per kg fluoride removed
    pub reagent_per_fluoride: f64,
    /// pH after construction or reset
    pub initial_ph: f64,
    /// Setpoint the pH signal relaxes toward
    pub target_ph: f64,
    /// Fraction of the remaining gap closed per step
    pub ph_relaxation: f64,
    /// Half-width of the uniform per-step perturbation
    pub ph_noise: f64,
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            mass_normalization: 1000.0 * 3600.0,
            // CaF₂ 78.07 g/mol over 2 F 37.997 g/mol
            fluorite_per_fluoride: 2.0547,
            // Ca(OH)₂ 74.09 g/mol over 2 F 37.997 g/mol
            reagent_per_fluoride: 1.95,
            initial_ph: 7.0,
            target_ph: 7.5,
            ph_relaxation: 0.1,
            ph_noise: 0.01,
        }
    }
}

/// Product and reagent prices (USD per ton)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Acid-grade fluorite
    pub high_purity_price: f64,
    /// Metallurgical-grade fluorite
    pub standard_purity_price: f64,
    pub reagent_cost: f64,
    /// Sludge disposal avoided per ton of fluoride captured
    pub avoided_disposal_cost: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            high_purity_price: 550.0,
            standard_purity_price: 300.0,
            reagent_cost: 180.0,
            avoided_disposal_cost: 1200.0,
        }
    }
}

impl MarketConfig {
    /// Price per ton for a purity mix given in percent of high-purity output
    pub fn blended_price(&self, purity_mix: f64) -> f64 {
        let share = purity_mix / 100.0;
        share * self.high_purity_price + (1.0 - share) * self.standard_purity_price
    }
}

/// Plant-level financial constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceConfig {
    /// Fixed operating cost per simulated day
    pub daily_fixed_cost: f64,
    /// Capital expenditure used for ROI and payback
    pub capex: f64,
    /// Maximum number of daily snapshots retained
    pub history_capacity: usize,
    /// Rolling reporting window, in simulated days
    pub window_days: u32,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            daily_fixed_cost: 450.0,
            capex: 1_500_000.0,
            history_capacity: 120,
            window_days: 30,
        }
    }
}

/// Fluidized-bed particle physics, in screen units per frame (y grows downward)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Flow rate at which the fluid velocity is 1.0 at speed 1
    pub reference_flow: f32,
    /// Spawn probability per frame at speed 1
    pub spawn_base_rate: f32,
    /// Inlet distance below the bed center
    pub inlet_offset: f32,
    /// Horizontal half-width of the inlet jitter
    pub inlet_jitter: f32,
    /// Probability that a spawned particle is a crystal
    pub crystal_share: f32,
    pub crystal_initial_size: f32,
    pub crystal_max_size: f32,
    /// Size gained per frame while suspended
    pub crystal_growth: f32,
    /// Height above the bed center at which crystals start settling
    pub sediment_threshold: f32,
    pub gravity: f32,
    pub drag: f32,
    /// Vertical velocity retained per frame while rising
    pub rising_damping: f32,
    pub sediment_gravity_multiplier: f32,
    /// Minimum downward speed once settling
    pub min_descent_speed: f32,
    /// Half-width of the per-particle horizontal drift
    pub drift: f32,
    pub fluid_min_size: f32,
    pub fluid_max_size: f32,
    /// Fluid rise speed per unit of fluid velocity
    pub fluid_rise_factor: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    pub fluid_initial_alpha: f32,
    /// Opacity lost per frame
    pub fluid_fade: f32,
    /// Bed bounds around the center; particles outside are culled
    pub bed_half_extents: Vec2,
    /// Bed center used until the host supplies its own geometry
    pub bed_center: Vec2,
    pub max_particles: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            reference_flow: 450.0,
            spawn_base_rate: 0.3,
            inlet_offset: 180.0,
            inlet_jitter: 25.0,
            crystal_share: 0.7,
            crystal_initial_size: 2.0,
            crystal_max_size: 6.0,
            crystal_growth: 0.01,
            sediment_threshold: 130.0,
            gravity: 0.015,
            drag: 0.2,
            rising_damping: 0.96,
            sediment_gravity_multiplier: 3.0,
            min_descent_speed: 0.6,
            drift: 0.15,
            fluid_min_size: 1.0,
            fluid_max_size: 3.0,
            fluid_rise_factor: 1.5,
            wobble_amplitude: 0.4,
            wobble_frequency: 0.05,
            fluid_initial_alpha: 0.8,
            fluid_fade: 0.004,
            bed_half_extents: Vec2::new(110.0, 200.0),
            bed_center: Vec2::new(400.0, 300.0),
            max_particles: 500,
        }
    }
}

impl SimConfig {
    /// Parse a configuration from RON text; missing sections fall back to defaults
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Reject bundles the engine cannot run with
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive(
            "clock.sim_seconds_per_scaled_second",
            self.clock.sim_seconds_per_scaled_second,
        )?;

        let chem = &self.chemistry;
        ensure_positive("chemistry.mass_normalization", chem.mass_normalization)?;
        ensure_positive("chemistry.fluorite_per_fluoride", chem.fluorite_per_fluoride)?;
        ensure_positive("chemistry.reagent_per_fluoride", chem.reagent_per_fluoride)?;
        ensure_in_range("chemistry.initial_ph", chem.initial_ph, 0.0, 14.0)?;
        ensure_in_range("chemistry.target_ph", chem.target_ph, 0.0, 14.0)?;
        ensure_in_range("chemistry.ph_relaxation", chem.ph_relaxation, 0.0, 1.0)?;
        ensure_non_negative("chemistry.ph_noise", chem.ph_noise)?;

        let market = &self.market;
        ensure_non_negative("market.high_purity_price", market.high_purity_price)?;
        ensure_non_negative("market.standard_purity_price", market.standard_purity_price)?;
        ensure_non_negative("market.reagent_cost", market.reagent_cost)?;
        ensure_non_negative("market.avoided_disposal_cost", market.avoided_disposal_cost)?;

        let finance = &self.finance;
        ensure_non_negative("finance.daily_fixed_cost", finance.daily_fixed_cost)?;
        ensure_positive("finance.capex", finance.capex)?;
        ensure_positive("finance.window_days", f64::from(finance.window_days))?;
        if finance.history_capacity < MIN_WINDOW_HISTORY {
            return Err(ValidationError::InvalidConfig(format!(
                "finance.history_capacity must be at least {MIN_WINDOW_HISTORY} (got {})",
                finance.history_capacity
            )));
        }

        let p = &self.particles;
        ensure_positive("particles.reference_flow", f64::from(p.reference_flow))?;
        ensure_non_negative("particles.spawn_base_rate", f64::from(p.spawn_base_rate))?;
        ensure_in_range("particles.crystal_share", f64::from(p.crystal_share), 0.0, 1.0)?;
        ensure_positive("particles.crystal_initial_size", f64::from(p.crystal_initial_size))?;
        if p.crystal_max_size <= p.crystal_initial_size {
            return Err(ValidationError::InvalidConfig(format!(
                "particles.crystal_max_size ({}) must exceed crystal_initial_size ({})",
                p.crystal_max_size, p.crystal_initial_size
            )));
        }
        ensure_non_negative("particles.crystal_growth", f64::from(p.crystal_growth))?;
        ensure_in_range("particles.rising_damping", f64::from(p.rising_damping), 0.0, 1.0)?;
        ensure_positive("particles.fluid_min_size", f64::from(p.fluid_min_size))?;
        if p.fluid_max_size < p.fluid_min_size {
            return Err(ValidationError::InvalidConfig(format!(
                "particles.fluid_max_size ({}) is below fluid_min_size ({})",
                p.fluid_max_size, p.fluid_min_size
            )));
        }
        ensure_positive("particles.fluid_fade", f64::from(p.fluid_fade))?;
        ensure_positive("particles.bed_half_extents.x", f64::from(p.bed_half_extents.x))?;
        ensure_positive("particles.bed_half_extents.y", f64::from(p.bed_half_extents.y))?;
        if p.max_particles == 0 {
            return Err(ValidationError::InvalidConfig(
                "particles.max_particles must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
