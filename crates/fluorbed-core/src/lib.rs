//! Process model for fluoride removal by calcium-fluoride crystallization
//!
//! This crate provides the simulation engine behind the fluidized-bed view:
//! - Time scaling from real frame deltas to process time (TimeScaler)
//! - Stoichiometric mass balance and pH signal (ReactionAccumulator)
//! - Revenue, cost and savings with daily snapshots (FinancialLedger)
//! - Crystal and fluid particles for rendering (ParticleSystem)
//!
//! `Simulation` ties them together behind a single `tick` entry point.

pub mod clock;
pub mod config;
pub mod error;
pub mod inputs;
pub mod ledger;
pub mod particles;
pub mod reaction;
pub mod rng;
pub mod simulation;

pub use clock::{ClockStep, ElapsedTime, TimeScaler};
pub use config::{
    ChemistryConfig, ClockConfig, FinanceConfig, MarketConfig, ParticleConfig, SimConfig,
};
pub use error::{ConfigError, ValidationError};
pub use inputs::ControlInputs;
pub use ledger::{
    DailySnapshot, FinancialHistory, FinancialLedger, WindowMetrics, compute_window,
    payback_years, roi_percent,
};
pub use particles::{ColorClass, CrystalPhase, Particle, ParticleKind, ParticleSystem, ParticleView};
pub use reaction::{MassFlow, ReactionAccumulator};
pub use rng::SimRng;
pub use simulation::{Simulation, SimulationReport, TickResult};
