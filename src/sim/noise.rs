//! Seeded gradient noise
//!
//! Smooth pseudo-random field keyed by (space, time), used to flicker the
//! fire-wall flames.

use glam::Vec2;
use std::f32::consts::TAU;

/// Multi-octave 2D gradient noise. Output stays within [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseField {
    seed: u32,
    octaves: u32,
}

impl NoiseField {
    pub fn new(seed: u32, octaves: u32) -> Self {
        Self {
            seed,
            octaves: octaves.max(1),
        }
    }

    /// Sample the field at (x, y)
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;
        for octave in 0..self.octaves {
            let octave_seed = self.seed.wrapping_add(octave.wrapping_mul(0x9E37_79B9));
            total += gradient_noise(x * frequency, y * frequency, octave_seed) * amplitude;
            norm += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        (total / norm).clamp(-1.0, 1.0)
    }
}

/// Single-octave Perlin-style noise
fn gradient_noise(x: f32, y: f32, seed: u32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let ix = x0 as i32;
    let iy = y0 as i32;

    let d00 = lattice_gradient(ix, iy, seed).dot(Vec2::new(fx, fy));
    let d10 = lattice_gradient(ix + 1, iy, seed).dot(Vec2::new(fx - 1.0, fy));
    let d01 = lattice_gradient(ix, iy + 1, seed).dot(Vec2::new(fx, fy - 1.0));
    let d11 = lattice_gradient(ix + 1, iy + 1, seed).dot(Vec2::new(fx - 1.0, fy - 1.0));

    let u = fade(fx);
    let v = fade(fy);
    let top = lerp(d00, d10, u);
    let bottom = lerp(d01, d11, u);
    // Max magnitude of 2D gradient noise is sqrt(0.5)
    lerp(top, bottom, v) * std::f32::consts::SQRT_2
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unit gradient for a lattice point
fn lattice_gradient(ix: i32, iy: i32, seed: u32) -> Vec2 {
    let h = hash(ix as u32, iy as u32, seed);
    let angle = (h as f32 / u32::MAX as f32) * TAU;
    Vec2::from_angle(angle)
}

fn hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed ^ 0x2545_F491;
    h = h.wrapping_add(x.wrapping_mul(0x27D4_EB2D));
    h = (h ^ (h >> 15)).wrapping_mul(0x85EB_CA6B);
    h = h.wrapping_add(y.wrapping_mul(0x1656_67B1));
    h = (h ^ (h >> 13)).wrapping_mul(0xC2B2_AE35);
    h ^ (h >> 16)
}
