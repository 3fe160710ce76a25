//! Frame timing utilities

use std::time::{Duration, Instant};

/// Frame clock for the scene loop
///
/// Produces the delta fed to the update step. Real-time hosts call
/// [`FrameClock::tick`]; simulated hosts call [`FrameClock::advance`] with a
/// fixed step. Either way the delta is clamped to `max_delta` so a long stall
/// (backgrounded tab, debugger pause) cannot teleport every entity.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FrameClock {
    /// Create a new clock with the given delta clamp (seconds)
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: max_delta.max(0.0),
        }
    }

    /// Measure wall-clock time since the previous tick and return the delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(elapsed.as_secs_f32())
    }

    /// Advance by a caller-supplied delta and return the clamped value
    ///
    /// Negative and non-finite inputs count as zero.
    pub fn advance(&mut self, delta: f32) -> f32 {
        let delta = if delta.is_finite() { delta.clamp(0.0, self.max_delta) } else { 0.0 };
        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
        delta
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total simulated time in seconds
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the delta clamp
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Get the average FPS since clock creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Duration of one frame at the given refresh rate
pub fn frame_interval(target_fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)))
}
