//! Fixed-rate simulation tick
//!
//! One call is one 60 Hz frame. Order of operations:
//! input → player → spawner or fire wall → obstacles/powerups → collisions
//! and combo → death explosion → explosion particles.

use glam::Vec2;

use super::collision::{collect_powerups, resolve_obstacles};
use super::entities::Steer;
use super::fire_wall;
use super::particle;
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::Playing {
        step_playing(state, input);
    }

    // Death explosion, exactly once per run
    if state.phase == GamePhase::GameOver && !state.explosion_spawned {
        let at = Vec2::new(state.player.pos.x, state.player.pos.y + 15.0);
        particle::burst(&mut state.rng, at, &mut state.particles);
        state.explosion_spawned = true;
        log::info!(
            "Player destroyed at tick {} with score {}",
            state.time_ticks,
            state.final_score()
        );
        state.push_event(GameEvent::PlayerDestroyed { at });
    }

    // Explosions keep settling after game over
    particle::advance_all(&mut state.particles);
}

fn step_playing(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    state.player.target_tilt = 0.0;
    if input.left {
        state.player.steer(Steer::Left);
    }
    if input.right {
        state.player.steer(Steer::Right);
    }
    state.player.update(&mut state.rng);

    if state.fire_wall.is_active() {
        if state.fire_wall.check_exit() {
            log::info!("Fire wall cleared at tick {}", state.time_ticks);
            state.push_event(GameEvent::FireWallCleared);
        }
    } else {
        spawner::run(state);
        if fire_wall::should_trigger(state.score, &mut state.rng) {
            fire_wall::trigger(state);
        }
    }

    state.score += state.combo.multiplier() / FPS as f64;

    let elapsed = state.elapsed_secs();
    for obstacle in &mut state.obstacles {
        obstacle.update(&mut state.rng, elapsed);
    }
    state.obstacles.retain(|o| !o.off_screen());
    for powerup in &mut state.powerups {
        powerup.advance();
    }
    state.powerups.retain(|p| !p.off_screen());

    let fire_wall_active = state.fire_wall.is_active();
    let report = resolve_obstacles(
        &mut state.player,
        &mut state.obstacles,
        &mut state.combo,
        fire_wall_active,
    );
    for _ in &report.absorbed {
        log::info!("Shield absorbed a hit");
        state.push_event(GameEvent::ShieldAbsorbed);
    }
    if report.player_hit {
        state.phase = GamePhase::GameOver;
    }

    for at in collect_powerups(&state.player, &mut state.powerups) {
        particle::burst(&mut state.rng, at, &mut state.particles);
        state.push_event(GameEvent::PowerupCollected { at });
    }

    // Warning banner only counts down while the run is alive
    if state.phase == GamePhase::Playing {
        state.fire_wall.advance();
    }
}
