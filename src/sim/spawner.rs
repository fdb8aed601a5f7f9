//! Spawn policy
//!
//! Independent, memoryless per-frame trials. Several spawns may land on the
//! same frame. Difficulty comes only from the obstacle speed ramp.

use rand::Rng;

use super::state::GameState;
use crate::consts::*;

/// Outcome of one frame's spawn trials
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnRoll {
    pub obstacle: bool,
    pub powerup: bool,
}

pub fn roll(rng: &mut impl Rng) -> SpawnRoll {
    SpawnRoll {
        obstacle: rng.random_ratio(OBSTACLE_SPAWN_ODDS.0, OBSTACLE_SPAWN_ODDS.1),
        powerup: rng.random_ratio(POWERUP_SPAWN_ODDS.0, POWERUP_SPAWN_ODDS.1),
    }
}

/// Run the normal (non fire-wall) spawn trials for this frame
pub fn run(state: &mut GameState) -> SpawnRoll {
    let spawned = roll(&mut state.rng);
    if spawned.obstacle {
        state.spawn_obstacle();
    }
    if spawned.powerup {
        state.spawn_powerup();
    }
    spawned
}
