//! Headless driver for the fluorbed engine
//!
//! Loads layered configuration, runs the tick loop at a fixed frame delta and
//! writes a JSON report.

pub mod config;
pub mod report;
pub mod runner;

pub use report::{PerformanceMetrics, RunReport};
pub use runner::{RunOptions, run};
