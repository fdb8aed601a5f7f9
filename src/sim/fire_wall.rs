//! Fire-wall event
//!
//! A scripted hazard: the field is cleared and five pairs of burning wall
//! segments sweep down, each pair leaving a gap the player has to thread.
//! Normal spawning and combo grazing are suspended until the last pair has
//! left the screen.

use rand::Rng;

use super::entities::Obstacle;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Fire-wall event phase
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FireWall {
    /// Normal spawning
    #[default]
    Normal,
    /// Walls placed and falling, warning banner still showing
    Warning { frames_left: u32, trailing_y: f32 },
    /// Walls in flight
    Active { trailing_y: f32 },
}

impl FireWall {
    pub fn is_active(&self) -> bool {
        !matches!(self, FireWall::Normal)
    }

    /// Frames of warning banner left (0 when not warning)
    pub fn warning_frames(&self) -> u32 {
        match self {
            FireWall::Warning { frames_left, .. } => *frames_left,
            _ => 0,
        }
    }

    /// Top edge of the last-placed segment, while an event runs
    pub fn trailing_y(&self) -> Option<f32> {
        match self {
            FireWall::Normal => None,
            FireWall::Warning { trailing_y, .. } | FireWall::Active { trailing_y } => {
                Some(*trailing_y)
            }
        }
    }

    /// Return to normal once the last segment is below the screen.
    /// Returns true on the frame the event ends.
    pub fn check_exit(&mut self) -> bool {
        match self.trailing_y() {
            Some(y) if y > SCREEN_HEIGHT => {
                *self = FireWall::Normal;
                true
            }
            _ => false,
        }
    }

    /// Track the last segment and count down the warning
    pub fn advance(&mut self) {
        *self = match *self {
            FireWall::Normal => FireWall::Normal,
            FireWall::Warning {
                frames_left,
                trailing_y,
            } => {
                let trailing_y = trailing_y + FIRE_WALL_SPEED;
                match frames_left.saturating_sub(1) {
                    0 => FireWall::Active { trailing_y },
                    frames_left => FireWall::Warning {
                        frames_left,
                        trailing_y,
                    },
                }
            }
            FireWall::Active { trailing_y } => FireWall::Active {
                trailing_y: trailing_y + FIRE_WALL_SPEED,
            },
        };
    }
}

/// Per-frame trigger roll; only eligible past the score threshold
pub fn should_trigger(score: f64, rng: &mut impl Rng) -> bool {
    score >= FIRE_WALL_SCORE_THRESHOLD && rng.random_ratio(FIRE_WALL_ODDS.0, FIRE_WALL_ODDS.1)
}

/// Gap x positions for each pair: a bounded random walk from screen center
pub fn plan_gaps(rng: &mut impl Rng) -> [f32; FIRE_WALL_PAIRS] {
    let margin = FIRE_WALL_MARGIN as i32;
    let drift = FIRE_WALL_DRIFT as i32;
    let right_limit = (SCREEN_WIDTH - FIRE_WALL_GAP - FIRE_WALL_MARGIN) as i32;

    let mut gaps = [0.0; FIRE_WALL_PAIRS];
    let mut last = (SCREEN_WIDTH / 2.0) as i32;
    for gap in gaps.iter_mut() {
        let min_x = margin.max(last - drift);
        let max_x = right_limit.min(last + drift);
        last = rng.random_range(min_x..=max_x);
        *gap = last as f32;
    }
    gaps
}

/// Clear the field and launch a fire wall
pub fn trigger(state: &mut GameState) {
    state.obstacles.clear();
    state.powerups.clear();

    let gaps = plan_gaps(&mut state.rng);
    let mut trailing_y = FIRE_WALL_FIRST_Y;
    for (i, gap_x) in gaps.iter().copied().enumerate() {
        let y = FIRE_WALL_FIRST_Y - i as f32 * FIRE_WALL_SPACING;
        let right_x = gap_x + FIRE_WALL_GAP;

        let left_id = state.next_entity_id();
        let left = Obstacle::fire_wall_segment(left_id, &mut state.rng, 0.0, y, gap_x);
        let right_id = state.next_entity_id();
        let right = Obstacle::fire_wall_segment(
            right_id,
            &mut state.rng,
            right_x,
            y,
            SCREEN_WIDTH - right_x,
        );
        state.obstacles.push(left);
        state.obstacles.push(right);
        trailing_y = y;
    }

    state.fire_wall = FireWall::Warning {
        frames_left: FIRE_WALL_WARNING_FRAMES,
        trailing_y,
    };
    log::info!(
        "Fire wall at tick {} (score {:.0}), gaps {:?}",
        state.time_ticks,
        state.score,
        gaps
    );
    state.push_event(GameEvent::FireWallIncoming);
}
