//! Operator control inputs read on every tick

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ensure_in_range, ensure_non_negative, ensure_positive};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Feed flow in m³/h
    pub flow_rate: f64,
    /// Feed fluoride in mg/L
    pub fluoride_concentration: f64,
    /// Percent of product routed to the high-purity grade
    pub purity_mix: f64,
    pub speed_multiplier: f64,
    pub running: bool,
}

impl Default for ControlInputs {
    fn default() -> Self {
        Self {
            flow_rate: 450.0,
            fluoride_concentration: 50.0,
            purity_mix: 50.0,
            speed_multiplier: 1.0,
            running: true,
        }
    }
}

impl ControlInputs {
    /// Fail-fast bounds check for drivers.
    ///
    /// `Simulation::tick` does not call this: it accepts any values and
    /// leaves range enforcement to the caller.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("flow_rate", self.flow_rate)?;
        ensure_non_negative("fluoride_concentration", self.fluoride_concentration)?;
        ensure_in_range("purity_mix", self.purity_mix, 0.0, 100.0)?;
        ensure_positive("speed_multiplier", self.speed_multiplier)?;
        Ok(())
    }
}
