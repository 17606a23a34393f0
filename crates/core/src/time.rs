//! Engine time for frame updates and deferred work.

use std::time::{Duration, Instant};

/// Engine clock exposing total and per-frame time.
///
/// The clock can follow the wall clock via [`Time::tick`] or be stepped by a
/// fixed amount via [`Time::advance`], which keeps headless runs and tests
/// deterministic.
#[derive(Debug)]
pub struct Time {
    last_tick: Instant,
    elapsed: Duration,
    delta: Duration,
    frame_count: u64,
}

impl Time {
    /// Create a new clock, starting from now.
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance by the wall-clock time since the previous tick.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        self.advance(delta);
        delta
    }

    /// Advance by a fixed step.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Total time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total time in milliseconds.
    pub fn time_ms(&self) -> f32 {
        self.elapsed.as_secs_f32() * 1000.0
    }

    /// Duration of the last frame in milliseconds.
    pub fn delta_ms(&self) -> f32 {
        self.delta.as_secs_f32() * 1000.0
    }

    /// Number of frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reset to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
