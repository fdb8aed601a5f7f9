//! Game state and core simulation types
//!
//! Everything one run owns lives here. The session loop is the only writer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Combo;
use super::entities::{Obstacle, Player, Powerup};
use super::fire_wall::FireWall;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player destroyed; explosion still settling
    GameOver,
}

/// Notable things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player touched a powerup at this point; a quiz should follow
    PowerupCollected { at: Vec2 },
    /// Shield soaked up an obstacle hit
    ShieldAbsorbed,
    /// Fire-wall event started
    FireWallIncoming,
    /// Last fire-wall segment left the screen
    FireWallCleared,
    /// Player was hit without a shield
    PlayerDestroyed { at: Vec2 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Fractional score
    pub score: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub combo: Combo,
    pub fire_wall: FireWall,
    pub phase: GamePhase,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub powerups: Vec<Powerup>,
    /// Explosion particles (not gameplay-affecting)
    pub particles: Vec<super::particle::Particle>,
    /// The death explosion has been spawned
    pub explosion_spawned: bool,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0.0,
            time_ticks: 0,
            combo: Combo::default(),
            fire_wall: FireWall::Normal,
            phase: GamePhase::Playing,
            player: Player::new(),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            explosion_spawned: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Score as submitted to the leaderboard
    pub fn final_score(&self) -> u64 {
        self.score.max(0.0) as u64
    }

    /// Elapsed play time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.time_ticks as f32 / FPS as f32
    }

    /// Add a random asteroid/drone/scout above the screen
    pub fn spawn_obstacle(&mut self) {
        let id = self.next_entity_id();
        let obstacle = Obstacle::spawn(id, &mut self.rng, self.time_ticks);
        log::debug!("Spawned {} #{} at x {:.0}", obstacle.kind.name(), id, obstacle.pos.x);
        self.obstacles.push(obstacle);
    }

    pub fn spawn_powerup(&mut self) {
        let id = self.next_entity_id();
        let powerup = Powerup::spawn(id, &mut self.rng);
        self.powerups.push(powerup);
    }

    /// Apply a quiz answer: a correct answer pays a bonus and arms the shield
    pub fn apply_quiz_answer(&mut self, correct: bool) {
        if correct {
            self.score += QUIZ_BONUS;
            self.player.shield = true;
            log::info!("Quiz answered correctly, shield up (score {:.0})", self.score);
        } else {
            log::info!("Quiz answered incorrectly");
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.combo.multiplier(), COMBO_MIN);
        assert!(!state.fire_wall.is_active());
        assert!(!state.player.shield);
        assert_eq!(state.final_score(), 0);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(2);
        state.spawn_obstacle();
        state.spawn_obstacle();
        state.spawn_powerup();
        assert_ne!(state.obstacles[0].id, state.obstacles[1].id);
        assert_ne!(state.obstacles[1].id, state.powerups[0].id);
    }

    #[test]
    fn test_quiz_answer() {
        let mut state = GameState::new(3);
        state.score = 12.5;
        state.apply_quiz_answer(false);
        assert_eq!(state.score, 12.5);
        assert!(!state.player.shield);
        state.apply_quiz_answer(true);
        assert_eq!(state.score, 62.5);
        assert!(state.player.shield);
        // Idempotent shield
        state.apply_quiz_answer(true);
        assert!(state.player.shield);
    }

    #[test]
    fn test_drain_events() {
        let mut state = GameState::new(4);
        state.push_event(GameEvent::ShieldAbsorbed);
        assert_eq!(state.drain_events(), vec![GameEvent::ShieldAbsorbed]);
        assert!(state.drain_events().is_empty());
    }
}
