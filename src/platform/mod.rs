//! Platform layer
//!
//! Terminal-specific pieces the session loop needs:
//! - `clock`: fixed 60 Hz frame pacing
//! - `input`: background key reader and held-key tracking

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::InputPump;
