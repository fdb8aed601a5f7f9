//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed 60 Hz frames only
//! - Seeded RNG only
//! - No rendering, audio or network dependencies

pub mod collision;
pub mod entities;
pub mod fire_wall;
pub mod noise;
pub mod particle;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Combo, CollisionReport, collect_powerups, resolve_obstacles};
pub use entities::{Obstacle, ObstacleKind, Player, Powerup, Steer};
pub use fire_wall::FireWall;
pub use noise::NoiseField;
pub use particle::Particle;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
