//! Scrolling star field behind the playfield

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::palette::Rgb;

/// Slowest and fastest star speeds (units per frame)
const MIN_SPEED: f32 = 0.5;
const MAX_SPEED: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub speed: f32,
}

impl Star {
    /// Faster stars are brighter and bigger
    pub fn glyph(&self) -> (char, Rgb) {
        let level = (self.speed / MAX_SPEED * 255.0).clamp(0.0, 255.0) as u8;
        let glyph = if self.speed > 1.5 {
            '*'
        } else if self.speed > 1.0 {
            '+'
        } else {
            '.'
        };
        (glyph, Rgb(level, level, level))
    }
}

/// Purely decorative; has its own RNG so it never perturbs the simulation
pub struct Starfield {
    stars: Vec<Star>,
    rng: Pcg32,
}

impl Starfield {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..SCREEN_WIDTH),
                    rng.random_range(0.0..SCREEN_HEIGHT),
                ),
                speed: rng.random_range(MIN_SPEED..MAX_SPEED),
            })
            .collect();
        Self { stars, rng }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Fall one frame; stars leaving the bottom re-enter at the top
    pub fn advance(&mut self) {
        for star in &mut self.stars {
            star.pos.y += star.speed;
            if star.pos.y > SCREEN_HEIGHT {
                star.pos.y = 0.0;
                star.pos.x = self.rng.random_range(0.0..SCREEN_WIDTH);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_start_on_screen() {
        let field = Starfield::new(150, 3);
        assert_eq!(field.stars().len(), 150);
        for star in field.stars() {
            assert!(star.pos.x >= 0.0 && star.pos.x < SCREEN_WIDTH);
            assert!(star.pos.y >= 0.0 && star.pos.y < SCREEN_HEIGHT);
            assert!(star.speed >= MIN_SPEED && star.speed < MAX_SPEED);
        }
    }

    #[test]
    fn test_stars_wrap_to_top() {
        let mut field = Starfield::new(40, 9);
        // Longest possible fall at the slowest speed
        let frames = (SCREEN_HEIGHT / MIN_SPEED) as usize + 1;
        let mut wrapped = false;
        for _ in 0..frames {
            field.advance();
            for star in field.stars() {
                assert!(star.pos.y <= SCREEN_HEIGHT);
                wrapped |= star.pos.y < star.speed;
            }
        }
        assert!(wrapped);
    }

    #[test]
    fn test_empty_field() {
        let mut field = Starfield::new(0, 1);
        field.advance();
        assert!(field.stars().is_empty());
    }

    #[test]
    fn test_brightness_tracks_speed() {
        let slow = Star {
            pos: Vec2::ZERO,
            speed: 0.6,
        };
        let fast = Star {
            pos: Vec2::ZERO,
            speed: 1.9,
        };
        let (slow_glyph, slow_color) = slow.glyph();
        let (fast_glyph, fast_color) = fast.glyph();
        assert_eq!(slow_glyph, '.');
        assert_eq!(fast_glyph, '*');
        assert!(fast_color.0 > slow_color.0);
    }
}
