//! Fixed-rate frame pacing

use std::time::{Duration, Instant};

/// Sleeps out the remainder of each frame
#[derive(Debug)]
pub struct FrameClock {
    period: Duration,
    frame_start: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            frame_start: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Block until the current frame's slot is used up. Overlong frames are
    /// not made up; the next frame starts immediately.
    pub fn wait(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.period {
            std::thread::sleep(self.period - elapsed);
        }
        self.frame_start = Instant::now();
    }
}
