//! Error types for Neon Runner

use thiserror::Error;

/// Errors from the I/O edges of the game (settings, leaderboard, audio, terminal).
/// The simulation itself has no error paths.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Leaderboard unreachable: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Leaderboard rejected score ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Audio error: {0}")]
    Audio(String),
}

/// Result type alias for Neon Runner operations
pub type Result<T> = std::result::Result<T, Error>;
