//! Visual particles
//!
//! Particles never affect gameplay. Each list is owned by the emitter that
//! created it (player exhaust, scout trail, fire-wall flames, explosions).

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::heading;
use crate::palette::{NEON_BLUE, ORANGE, Rgb, WHITE};

/// Size lost per frame
const SHRINK_PER_FRAME: f32 = 0.1;

/// Particles per explosion burst
pub const BURST_COUNT: usize = 60;

/// A single visual particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub color: Rgb,
    pub size: f32,
    /// Remaining frames
    pub life: i32,
    /// Fixed heading (radians)
    pub angle: f32,
    pub speed: f32,
}

impl Particle {
    pub fn spawn(pos: Vec2, color: Rgb, size: f32, life: i32, angle: f32, speed: f32) -> Self {
        Self {
            pos,
            color,
            size,
            life,
            angle,
            speed,
        }
    }

    /// Age by one frame and move along the heading
    pub fn advance(&mut self) {
        self.life -= 1;
        self.size = (self.size - SHRINK_PER_FRAME).max(0.0);
        self.pos += heading(self.angle) * self.speed;
    }

    pub fn expired(&self) -> bool {
        self.life <= 0 || self.size <= 0.0
    }
}

/// Advance every particle and drop the expired ones
pub fn advance_all(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.advance();
    }
    particles.retain(|p| !p.expired());
}

/// Spawn an explosion burst at `origin`
pub fn burst(rng: &mut impl Rng, origin: Vec2, out: &mut Vec<Particle>) {
    const COLORS: [Rgb; 3] = [NEON_BLUE, ORANGE, WHITE];

    out.reserve(BURST_COUNT);
    for _ in 0..BURST_COUNT {
        let angle = rng.random_range(0.0..TAU);
        let speed = rng.random_range(1.0..7.0);
        let size = rng.random_range(1.0..5.0);
        let life = rng.random_range(30..=60);
        let color = *COLORS.choose(rng).unwrap_or(&WHITE);
        out.push(Particle::spawn(origin, color, size, life, angle, speed));
    }
}
