//! Minimal frame host
//!
//! Plays the role of a display's refresh callback: it keeps asking the
//! handle for frames until the handle stops, the liveness token is revoked,
//! or the host's own budget runs out.

use super::driver::{FrameOutcome, SceneHandle};
use crate::config::SceneConfig;
use crate::foundation::time::{frame_interval, FrameClock};
use crate::render::Surface;
use std::time::{Duration, Instant};

/// How a loop run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSummary {
    /// Frames the host scheduled
    pub frames: u64,
    /// Outcome of the last frame (`Continue` when the budget ran out)
    pub outcome: FrameOutcome,
    /// Wall-clock time spent
    pub wall_time: Duration,
}

/// Host loop pacing frames at a target refresh rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoop {
    target_fps: u32,
}

impl FrameLoop {
    /// Create a loop scheduling `target_fps` frames per second
    pub fn new(target_fps: u32) -> Self {
        Self { target_fps: target_fps.max(1) }
    }

    /// Loop paced by the configuration's refresh rate
    pub fn for_config(config: &SceneConfig) -> Self {
        Self::new(config.target_fps)
    }

    /// Refresh rate
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Fixed step matching the refresh rate
    pub fn fixed_delta(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    /// Run up to `frames` frames of `delta` seconds without sleeping
    pub fn run_simulated<S: Surface>(&self, handle: &mut SceneHandle<S>, frames: u64, delta: f32) -> LoopSummary {
        let started = Instant::now();
        let liveness = handle.liveness();
        let mut summary = LoopSummary {
            frames: 0,
            outcome: FrameOutcome::Continue,
            wall_time: Duration::ZERO,
        };

        while summary.frames < frames {
            if !liveness.is_live() {
                summary.outcome = handle.frame(0.0);
                break;
            }
            summary.frames += 1;
            summary.outcome = handle.frame(delta);
            if !summary.outcome.should_continue() {
                break;
            }
        }

        summary.wall_time = started.elapsed();
        log::debug!("Simulated loop ran {} frames: {:?}", summary.frames, summary.outcome);
        summary
    }

    /// Run against the wall clock for at most `budget`
    ///
    /// Each frame measures the real time since the previous one and sleeps
    /// off whatever is left of the refresh interval.
    pub fn run_realtime<S: Surface>(&self, handle: &mut SceneHandle<S>, budget: Duration) -> LoopSummary {
        let started = Instant::now();
        let interval = frame_interval(self.target_fps);
        let liveness = handle.liveness();
        let mut clock = FrameClock::new(handle.config().max_delta);
        let mut summary = LoopSummary {
            frames: 0,
            outcome: FrameOutcome::Continue,
            wall_time: Duration::ZERO,
        };

        while started.elapsed() < budget {
            if !liveness.is_live() {
                summary.outcome = handle.frame(0.0);
                break;
            }
            let frame_started = Instant::now();
            summary.frames += 1;
            summary.outcome = handle.frame(clock.tick());
            if !summary.outcome.should_continue() {
                break;
            }
            if let Some(remaining) = interval.checked_sub(frame_started.elapsed()) {
                std::thread::sleep(remaining);
            }
        }

        summary.wall_time = started.elapsed();
        log::debug!(
            "Realtime loop ran {} frames in {:.2}s ({:.1} fps)",
            summary.frames,
            summary.wall_time.as_secs_f32(),
            clock.average_fps()
        );
        summary
    }
}
