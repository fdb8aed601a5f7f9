//! Player, obstacle and powerup entities

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::Aabb;
use super::noise::NoiseField;
use super::particle::{self, Particle};
use crate::consts::*;
use crate::palette::{GOLD, NEON_BLUE, ORANGE, RED, Rgb};

/// Horizontal steering input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// x is the ship's center, y its top edge (fixed)
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Visual tilt in degrees (left is positive)
    pub tilt: f32,
    pub target_tilt: f32,
    /// Absorbs the next obstacle hit
    pub shield: bool,
    /// Exhaust trail (newest last)
    pub trail: Vec<Particle>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0, PLAYER_Y),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            tilt: 0.0,
            target_tilt: 0.0,
            shield: false,
            trail: Vec::new(),
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos.x - self.width / 2.0, self.pos.y, self.width, self.height)
    }

    /// Shift horizontally and lean into the turn
    pub fn steer(&mut self, direction: Steer) {
        match direction {
            Steer::Left => {
                self.pos.x -= PLAYER_SPEED;
                self.target_tilt = PLAYER_TILT;
            }
            Steer::Right => {
                self.pos.x += PLAYER_SPEED;
                self.target_tilt = -PLAYER_TILT;
            }
        }
        let half = self.width / 2.0;
        self.pos.x = self.pos.x.clamp(half, SCREEN_WIDTH - half);
    }

    /// Ease the tilt, emit exhaust and age the trail
    ///
    /// The target tilt is cleared every frame, so steering must be re-applied
    /// by input each frame to keep leaning.
    pub fn update(&mut self, rng: &mut impl Rng) {
        self.tilt += (self.target_tilt - self.tilt) * TILT_EASE;
        if self.tilt.abs() < TILT_SNAP {
            self.tilt = 0.0;
        }
        self.target_tilt = 0.0;

        let color = if self.shield { GOLD } else { NEON_BLUE };
        self.trail.push(Particle::spawn(
            Vec2::new(self.pos.x, self.pos.y + 20.0),
            color,
            rng.random_range(2.0..4.0),
            20,
            FRAC_PI_2 + rng.random_range(-0.2..0.2),
            rng.random_range(2.0..4.0),
        ));
        particle::advance_all(&mut self.trail);
    }
}

/// Obstacle variants, each carrying only its own data
#[derive(Debug, Clone)]
pub enum ObstacleKind {
    /// Tumbling rock with a fixed silhouette (offsets from its center)
    Asteroid { silhouette: Vec<Vec2> },
    Drone,
    /// Fast dart leaving an engine trail
    Scout { trail: Vec<Particle> },
    /// One half of a fire-wall pair
    FireWallSegment { flames: Vec<Particle>, noise: NoiseField },
}

impl ObstacleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Asteroid { .. } => "asteroid",
            ObstacleKind::Drone => "drone",
            ObstacleKind::Scout { .. } => "scout",
            ObstacleKind::FireWallSegment { .. } => "fire_wall_segment",
        }
    }
}

/// A falling hazard
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Degrees
    pub rotation: f32,
    pub rotation_speed: f32,
    pub anim_timer: u32,
}

/// Normal obstacle speed after `time_ticks` frames of play
pub fn ramped_speed(time_ticks: u64) -> f32 {
    OBSTACLE_SPEED + (time_ticks / OBSTACLE_RAMP_TICKS) as f32 * OBSTACLE_RAMP_STEP
}

impl Obstacle {
    /// Random asteroid, drone or scout entering above the screen
    pub fn spawn(id: u32, rng: &mut impl Rng, time_ticks: u64) -> Self {
        match rng.random_range(0..3) {
            0 => Self::asteroid(id, rng, time_ticks),
            1 => Self::drone(id, rng, time_ticks),
            _ => Self::scout(id, rng, time_ticks),
        }
    }

    pub fn asteroid(id: u32, rng: &mut impl Rng, time_ticks: u64) -> Self {
        let size = rng.random_range(35..=60) as f32;
        let silhouette = asteroid_silhouette(rng, size);
        Self::entering(
            id,
            ObstacleKind::Asteroid { silhouette },
            Vec2::splat(size),
            ramped_speed(time_ticks),
            rng,
        )
    }

    pub fn drone(id: u32, rng: &mut impl Rng, time_ticks: u64) -> Self {
        Self::entering(
            id,
            ObstacleKind::Drone,
            Vec2::new(45.0, 35.0),
            ramped_speed(time_ticks),
            rng,
        )
    }

    pub fn scout(id: u32, rng: &mut impl Rng, time_ticks: u64) -> Self {
        Self::entering(
            id,
            ObstacleKind::Scout { trail: Vec::new() },
            Vec2::new(25.0, 35.0),
            ramped_speed(time_ticks),
            rng,
        )
    }

    /// Fire-wall segment at an explicit spot; ignores the difficulty ramp
    pub fn fire_wall_segment(id: u32, rng: &mut impl Rng, x: f32, y: f32, width: f32) -> Self {
        let noise = NoiseField::new(rng.random_range(0..=10_000), 2);
        Self::entering(
            id,
            ObstacleKind::FireWallSegment {
                flames: Vec::new(),
                noise,
            },
            Vec2::new(width, FIRE_WALL_HEIGHT),
            FIRE_WALL_SPEED,
            rng,
        )
        .with_position(x, y)
    }

    /// Random x, just above the top edge, random spin and animation phase
    fn entering(id: u32, kind: ObstacleKind, size: Vec2, speed: f32, rng: &mut impl Rng) -> Self {
        let max_x = (SCREEN_WIDTH - size.x).max(0.0);
        let x = rng.random_range(0.0..=max_x).floor();
        Self {
            id,
            kind,
            pos: Vec2::new(x, -size.y),
            size,
            speed,
            rotation: rng.random_range(0..=360) as f32,
            rotation_speed: rng.random_range(-2.0..2.0),
            anim_timer: rng.random_range(0..=120),
        }
    }

    /// Place the obstacle explicitly (top-left corner)
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn is_fire_wall(&self) -> bool {
        matches!(self.kind, ObstacleKind::FireWallSegment { .. })
    }

    /// Top edge has passed the bottom of the screen
    pub fn off_screen(&self) -> bool {
        self.pos.y > SCREEN_HEIGHT
    }

    /// Fall, spin and run the variant's particle effects
    pub fn update(&mut self, rng: &mut impl Rng, elapsed_secs: f32) {
        self.pos.y += self.speed;
        self.rotation = (self.rotation + self.rotation_speed).rem_euclid(360.0);
        self.anim_timer = self.anim_timer.wrapping_add(1);

        let (pos, size) = (self.pos, self.size);
        match &mut self.kind {
            ObstacleKind::Scout { trail } => {
                trail.push(Particle::spawn(
                    Vec2::new(pos.x + size.x / 2.0, pos.y),
                    ORANGE,
                    2.0,
                    15,
                    -FRAC_PI_2,
                    2.0,
                ));
                particle::advance_all(trail);
            }
            ObstacleKind::FireWallSegment { flames, noise } => {
                const FLAME_COLORS: [Rgb; 3] = [RED, ORANGE, GOLD];
                for _ in 0..3 {
                    let px = pos.x + rng.random_range(0.0..=size.x.max(0.0));
                    let py = pos.y + size.y;
                    let n = noise.sample(px * 0.05, elapsed_secs).abs();
                    let life = 10 + (n * 15.0) as i32;
                    let speed = 1.0 + n * 3.0;
                    let flame_size = 2.0 + n * 4.0;
                    let color = *FLAME_COLORS.choose(rng).unwrap_or(&ORANGE);
                    flames.push(Particle::spawn(
                        Vec2::new(px, py),
                        color,
                        flame_size,
                        life,
                        FRAC_PI_2,
                        speed,
                    ));
                }
                particle::advance_all(flames);
            }
            ObstacleKind::Asteroid { .. } | ObstacleKind::Drone => {}
        }
    }

    /// Particles owned by this obstacle (for drawing)
    pub fn particles(&self) -> &[Particle] {
        match &self.kind {
            ObstacleKind::Scout { trail } => trail,
            ObstacleKind::FireWallSegment { flames, .. } => flames,
            _ => &[],
        }
    }
}

/// 7-12 vertices around the center at jittered radii
fn asteroid_silhouette(rng: &mut impl Rng, size: f32) -> Vec<Vec2> {
    let count = rng.random_range(7..=12);
    (0..count)
        .map(|i| {
            let angle = (i as f32 / count as f32) * TAU;
            let dist = size / 2.0 * rng.random_range(0.8..1.2);
            Vec2::from_angle(angle) * dist
        })
        .collect()
}

/// Shield pickup; collecting it starts a quiz
#[derive(Debug, Clone)]
pub struct Powerup {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Degrees
    pub rotation: f32,
    pub glow: f32,
    glow_dir: f32,
}

impl Powerup {
    pub fn spawn(id: u32, rng: &mut impl Rng) -> Self {
        let x = rng.random_range(0.0..=SCREEN_WIDTH - POWERUP_SIZE).floor();
        Self {
            id,
            pos: Vec2::new(x, -POWERUP_SIZE),
            size: POWERUP_SIZE,
            speed: POWERUP_SPEED,
            rotation: 0.0,
            glow: 0.0,
            glow_dir: 1.0,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.pos = Vec2::new(x, y);
        self
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn off_screen(&self) -> bool {
        self.pos.y > SCREEN_HEIGHT
    }

    /// Fall, spin and pulse the glow between 0 and its max
    pub fn advance(&mut self) {
        self.pos.y += self.speed;
        self.rotation = (self.rotation + 5.0) % 360.0;
        self.glow += self.glow_dir;
        if self.glow >= POWERUP_GLOW_MAX || self.glow <= 0.0 {
            self.glow_dir = -self.glow_dir;
        }
    }
}
