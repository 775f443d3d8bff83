//! Shared helpers for integration tests
#![allow(dead_code)]

use fluorbed_core::{ControlInputs, SimConfig, Simulation};
use rand::RngCore;

/// Generator whose `gen_f32` is always 0.5: no pH noise, no jitter, no drift
pub struct MidpointRng;

impl RngCore for MidpointRng {
    fn next_u32(&mut self) -> u32 {
        0x8000_0000
    }

    fn next_u64(&mut self) -> u64 {
        0x8000_0000_0000_0000
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0x80);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

pub fn quiet_sim() -> Simulation<MidpointRng> {
    Simulation::new(SimConfig::default(), MidpointRng).expect("default config is valid")
}

/// Frame length that covers exactly one simulated day at speed 1
pub const ONE_DAY_MS: f64 = 6000.0;

pub fn inputs() -> ControlInputs {
    ControlInputs::default()
}
