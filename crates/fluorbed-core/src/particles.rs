//! Fluidized-bed particle model for visualization
//!
//! Crystals grow while the upflow keeps them suspended and settle once they
//! get heavy or reach the top of the bed. Fluid particles trace the upflow
//! and fade out. Positions are in screen space: y grows downward, so rising
//! means negative vertical velocity.
//!
//! Motion is frame-stepped: each non-empty tick advances every particle once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ParticleConfig;
use crate::rng::SimRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Crystal,
    Fluid,
}

/// Crystal lifecycle; `Sedimenting` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrystalPhase {
    Rising,
    Sedimenting,
}

/// Color bucket for the render sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorClass {
    GrowingCrystal,
    SettlingCrystal,
    Fluid,
}

/// Renderable state of one particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Vec2,
    pub size: f32,
    pub color_class: ColorClass,
    pub opacity: f32,
}

/// A single bed particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    kind: ParticleKind,
    phase: CrystalPhase,
    alpha: f32,
}

impl Particle {
    /// Crystal at rest with a fixed horizontal drift
    pub fn crystal(position: Vec2, size: f32, drift: f32) -> Self {
        Self {
            position,
            velocity: Vec2::new(drift, 0.0),
            size,
            kind: ParticleKind::Crystal,
            phase: CrystalPhase::Rising,
            alpha: 1.0,
        }
    }

    pub fn fluid(position: Vec2, size: f32, alpha: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            kind: ParticleKind::Fluid,
            phase: CrystalPhase::Rising,
            alpha,
        }
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    /// Current crystal phase; `None` for fluid particles
    pub fn phase(&self) -> Option<CrystalPhase> {
        match self.kind {
            ParticleKind::Crystal => Some(self.phase),
            ParticleKind::Fluid => None,
        }
    }

    pub fn is_sedimenting(&self) -> bool {
        self.kind == ParticleKind::Crystal && self.phase == CrystalPhase::Sedimenting
    }

    /// Opacity; crystals are always opaque
    pub fn alpha(&self) -> f32 {
        match self.kind {
            ParticleKind::Crystal => 1.0,
            ParticleKind::Fluid => self.alpha,
        }
    }

    /// Advance one frame under the shared fluid velocity
    pub fn advance(&mut self, fluid_velocity: f32, bed_center: Vec2, config: &ParticleConfig) {
        match self.kind {
            ParticleKind::Crystal => self.advance_crystal(fluid_velocity, bed_center, config),
            ParticleKind::Fluid => self.advance_fluid(fluid_velocity, config),
        }
    }

    fn advance_crystal(&mut self, fluid_velocity: f32, bed_center: Vec2, config: &ParticleConfig) {
        if self.phase == CrystalPhase::Rising {
            if self.size < config.crystal_max_size {
                self.size = (self.size + config.crystal_growth).min(config.crystal_max_size);
            }

            let above_threshold = self.position.y <= bed_center.y - config.sediment_threshold;
            if above_threshold || self.size >= config.crystal_max_size {
                self.phase = CrystalPhase::Sedimenting;
            }
        }

        match self.phase {
            CrystalPhase::Rising => {
                // Upflow drag weakens as the crystal grows
                let gravity = config.gravity * self.size;
                let drag = config.drag * fluid_velocity / self.size;
                self.velocity.y = (self.velocity.y + gravity - drag) * config.rising_damping;
            }
            CrystalPhase::Sedimenting => {
                let gravity = config.gravity * config.sediment_gravity_multiplier * self.size;
                self.velocity.y = (self.velocity.y + gravity).max(config.min_descent_speed);
            }
        }

        self.position += self.velocity;
    }

    fn advance_fluid(&mut self, fluid_velocity: f32, config: &ParticleConfig) {
        self.velocity.y = -fluid_velocity * config.fluid_rise_factor;
        self.velocity.x =
            (self.position.y * config.wobble_frequency).sin() * config.wobble_amplitude;
        self.position += self.velocity;
        self.alpha -= config.fluid_fade;
    }

    /// Outside the bed rectangle centered on `bed_center`
    pub fn out_of_bounds(&self, bed_center: Vec2, config: &ParticleConfig) -> bool {
        let offset = (self.position - bed_center).abs();
        offset.x > config.bed_half_extents.x || offset.y > config.bed_half_extents.y
    }

    /// Fluid particle that has fully faded
    pub fn is_depleted(&self) -> bool {
        self.kind == ParticleKind::Fluid && self.alpha <= 0.0
    }

    pub fn color_class(&self) -> ColorClass {
        match (self.kind, self.phase) {
            (ParticleKind::Fluid, _) => ColorClass::Fluid,
            (ParticleKind::Crystal, CrystalPhase::Rising) => ColorClass::GrowingCrystal,
            (ParticleKind::Crystal, CrystalPhase::Sedimenting) => ColorClass::SettlingCrystal,
        }
    }

    pub fn view(&self) -> ParticleView {
        ParticleView {
            position: self.position,
            size: self.size,
            color_class: self.color_class(),
            opacity: self.alpha(),
        }
    }
}

/// Owns the particle population of one bed
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    config: ParticleConfig,
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new(config: &ParticleConfig) -> Self {
        Self {
            config: config.clone(),
            particles: Vec::with_capacity(config.max_particles),
        }
    }

    pub fn reconfigure(&mut self, config: &ParticleConfig) {
        self.config = config.clone();
        if self.particles.len() > self.config.max_particles {
            let excess = self.particles.len() - self.config.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Shared upflow velocity for a tick
    pub fn fluid_velocity(&self, flow_rate: f32, speed: f32) -> f32 {
        flow_rate / self.config.reference_flow * speed
    }

    /// Advance, cull, then maybe spawn. A non-positive delta is a no-op.
    pub fn update<R: SimRng + ?Sized>(
        &mut self,
        real_delta_ms: f64,
        speed: f32,
        flow_rate: f32,
        bed_center: Vec2,
        rng: &mut R,
    ) {
        if real_delta_ms.is_nan() || real_delta_ms <= 0.0 {
            return;
        }

        let fluid_velocity = self.fluid_velocity(flow_rate, speed);
        let config = &self.config;

        // Single filtering pass: advance each particle, keep the survivors
        self.particles.retain_mut(|p| {
            p.advance(fluid_velocity, bed_center, config);
            !(p.out_of_bounds(bed_center, config) || p.is_depleted())
        });

        let spawn_chance = (self.config.spawn_base_rate * speed).min(1.0);
        if rng.check_probability(spawn_chance) {
            self.spawn_random(bed_center, rng);
        }
    }

    fn spawn_random<R: SimRng + ?Sized>(&mut self, bed_center: Vec2, rng: &mut R) {
        let config = &self.config;
        let inlet = bed_center
            + Vec2::new(
                rng.gen_signed(config.inlet_jitter),
                config.inlet_offset,
            );

        let particle = if rng.check_probability(config.crystal_share) {
            Particle::crystal(
                inlet,
                config.crystal_initial_size,
                rng.gen_signed(config.drift),
            )
        } else {
            Particle::fluid(
                inlet,
                rng.gen_range_f32(config.fluid_min_size, config.fluid_max_size),
                config.fluid_initial_alpha,
            )
        };

        self.spawn_at(particle);
    }

    /// Insert a particle, evicting the oldest when at capacity
    pub fn spawn_at(&mut self, particle: Particle) {
        if self.particles.len() >= self.config.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn views(&self) -> impl Iterator<Item = ParticleView> + '_ {
        self.particles.iter().map(Particle::view)
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
