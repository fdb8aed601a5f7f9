//! Neon Runner - A neon arcade dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, combo, fire wall)
//! - `session`: Modal session flow (name entry, play, quiz, game over, leaderboard view)
//! - `leaderboard`: Score submission to the leaderboard service
//! - `audio`: Music and sound cues
//! - `renderer`: Terminal rendering
//! - `platform`: Frame clock and input polling

pub mod audio;
pub mod error;
pub mod leaderboard;
pub mod platform;
pub mod quiz;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use session::{Flow, Key, Screen, Session, SessionInput};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (world units)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Fixed frame rate
    pub const FPS: u32 = 60;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 35.0;
    pub const PLAYER_HEIGHT: f32 = 35.0;
    pub const PLAYER_Y: f32 = SCREEN_HEIGHT - 100.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Tilt target while steering (degrees)
    pub const PLAYER_TILT: f32 = 20.0;
    /// Fraction of the remaining tilt closed each frame
    pub const TILT_EASE: f32 = 0.1;
    pub const TILT_SNAP: f32 = 0.1;

    /// Obstacle base speed and difficulty ramp
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const OBSTACLE_RAMP_STEP: f32 = 0.5;
    /// Ticks per ramp step
    pub const OBSTACLE_RAMP_TICKS: u64 = 1000;

    pub const POWERUP_SPEED: f32 = 3.0;
    pub const POWERUP_SIZE: f32 = 25.0;
    pub const POWERUP_GLOW_MAX: f32 = 10.0;

    /// Per-frame spawn odds (numerator, denominator)
    pub const OBSTACLE_SPAWN_ODDS: (u32, u32) = (4, 100);
    pub const POWERUP_SPAWN_ODDS: (u32, u32) = (1, 300);

    /// Combo multiplier
    pub const COMBO_MIN: f64 = 1.0;
    pub const COMBO_MAX: f64 = 5.0;
    pub const COMBO_STEP: f64 = 0.05;
    /// Frames without a graze before the multiplier starts decaying (1.5 s)
    pub const COMBO_WINDOW: u32 = FPS * 3 / 2;
    /// Graze box inflation on each side
    pub const GRAZE_MARGIN: f32 = 30.0;

    /// Fire-wall event
    pub const FIRE_WALL_SCORE_THRESHOLD: f64 = 200.0;
    pub const FIRE_WALL_ODDS: (u32, u32) = (1, 1500);
    pub const FIRE_WALL_PAIRS: usize = 5;
    pub const FIRE_WALL_GAP: f32 = 140.0;
    pub const FIRE_WALL_DRIFT: f32 = 200.0;
    pub const FIRE_WALL_MARGIN: f32 = 50.0;
    pub const FIRE_WALL_SPACING: f32 = 300.0;
    pub const FIRE_WALL_FIRST_Y: f32 = -100.0;
    pub const FIRE_WALL_HEIGHT: f32 = 25.0;
    pub const FIRE_WALL_SPEED: f32 = 4.0;
    pub const FIRE_WALL_WARNING_FRAMES: u32 = 90;

    /// Score rewards
    pub const QUIZ_BONUS: f64 = 50.0;
}

/// Neon color palette
pub mod palette {
    /// An 8-bit RGB color
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Rgb(pub u8, pub u8, pub u8);

    pub const NEON_BLUE: Rgb = Rgb(0, 255, 255);
    pub const NEON_PINK: Rgb = Rgb(255, 0, 255);
    pub const NEON_GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLACK: Rgb = Rgb(10, 10, 10);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GOLD: Rgb = Rgb(255, 215, 0);
    pub const PURPLE: Rgb = Rgb(180, 0, 255);
    pub const GREY: Rgb = Rgb(150, 150, 150);
}

/// Unit vector for a heading in radians (screen coordinates, +y down)
#[inline]
pub fn heading(angle: f32) -> glam::Vec2 {
    glam::Vec2::new(angle.cos(), angle.sin())
}
