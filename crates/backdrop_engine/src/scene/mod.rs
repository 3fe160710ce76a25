//! Scene loop
//!
//! [`Scene`] owns the pool and runs the per-tick pipeline. [`SceneDriver`]
//! adds the outside world: it acquires a surface, forwards host frame
//! callbacks, renders, reports collections and scores, and tears everything
//! down exactly once. [`FrameLoop`] is a minimal host that drives a handle
//! either at a fixed step or against the wall clock.

mod driver;
mod frame_loop;
mod recorder;
mod simulation;
mod spawner;
mod state;

pub use driver::{DriverError, FrameOutcome, FrameStats, SceneDriver, SceneHandle};
pub use frame_loop::{FrameLoop, LoopSummary};
pub use recorder::{EntitySample, PositionLog, TickSample};
pub use simulation::{Scene, TickReport, DEFAULT_LOG_LIMIT};
pub use spawner::Spawner;
pub use state::{DriverState, LivenessToken, StopReason};
