//! Collision, graze and combo resolution
//!
//! Everything is axis-aligned: the player box, the inflated graze box and
//! every obstacle/powerup box. Asteroid silhouettes are visual only.

use glam::Vec2;

use super::entities::{Obstacle, Player, Powerup};
use crate::consts::*;

/// Axis-aligned bounding box (top-left origin, +y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            size: self.size + Vec2::splat(margin * 2.0),
        }
    }

    /// Strict overlap; boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Score multiplier grown by grazing and decayed by its absence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combo {
    multiplier: f64,
    /// Frames left before decay kicks in
    countdown: u32,
}

impl Default for Combo {
    fn default() -> Self {
        Self {
            multiplier: COMBO_MIN,
            countdown: 0,
        }
    }
}

impl Combo {
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn is_maxed(&self) -> bool {
        self.multiplier >= COMBO_MAX
    }

    /// A near miss: grow the multiplier and restart the decay window
    pub fn graze(&mut self) {
        self.multiplier = (self.multiplier + COMBO_STEP).min(COMBO_MAX);
        self.countdown = COMBO_WINDOW;
    }

    /// A frame without grazing
    pub fn idle(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.multiplier = (self.multiplier - COMBO_STEP).max(COMBO_MIN);
        }
    }
}

/// What happened between the player and the obstacles this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Player was hit without a shield
    pub player_hit: bool,
    /// Obstacle ids destroyed by the shield
    pub absorbed: Vec<u32>,
    /// Number of grazes counted toward the combo
    pub grazes: u32,
}

/// Resolve player/obstacle contact for one frame
///
/// An exact hit consumes the shield (destroying only that obstacle) or ends
/// the run. A graze-box overlap without an exact hit feeds the combo unless a
/// fire-wall event is running. Destroyed obstacles are removed after the scan.
pub fn resolve_obstacles(
    player: &mut Player,
    obstacles: &mut Vec<Obstacle>,
    combo: &mut Combo,
    fire_wall_active: bool,
) -> CollisionReport {
    let player_box = player.hitbox();
    let graze_box = player_box.inflate(GRAZE_MARGIN);
    let mut report = CollisionReport::default();

    for obstacle in obstacles.iter() {
        let obstacle_box = obstacle.hitbox();
        if player_box.intersects(&obstacle_box) {
            if player.shield {
                player.shield = false;
                report.absorbed.push(obstacle.id);
            } else {
                report.player_hit = true;
            }
        } else if graze_box.intersects(&obstacle_box) && !fire_wall_active {
            combo.graze();
            report.grazes += 1;
        }
    }

    if report.grazes == 0 && !fire_wall_active {
        combo.idle();
    }

    if !report.absorbed.is_empty() {
        obstacles.retain(|o| !report.absorbed.contains(&o.id));
    }

    report
}

/// Remove every powerup touching the player, returning their centers
pub fn collect_powerups(player: &Player, powerups: &mut Vec<Powerup>) -> Vec<Vec2> {
    let player_box = player.hitbox();
    let (taken, kept): (Vec<Powerup>, Vec<Powerup>) = powerups
        .drain(..)
        .partition(|p| player_box.intersects(&p.hitbox()));
    *powerups = kept;
    taken.iter().map(|p| p.hitbox().center()).collect()
}
