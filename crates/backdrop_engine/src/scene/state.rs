//! Driver lifecycle state

use std::cell::Cell;
use std::rc::Rc;

/// Why a scene loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// `stop()` was called
    Requested,
    /// The host revoked the liveness token
    Cancelled,
    /// The rendering surface became unavailable
    SurfaceLost,
    /// The handle was dropped while running
    Dropped,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Requested => "stop requested",
            Self::Cancelled => "cancelled by host",
            Self::SurfaceLost => "surface lost",
            Self::Dropped => "handle dropped",
        };
        f.write_str(text)
    }
}

/// Driver state machine: `Idle -> Running -> Stopped`
///
/// `Stopped` is terminal. A scene that needs to run again gets a new driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, surface not yet acquired
    Idle,
    /// Advancing one frame per host callback
    Running,
    /// Finished; resources released
    Stopped(StopReason),
}

impl DriverState {
    /// Whether frames are being produced
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether the driver has reached its terminal state
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }
}

/// Shared liveness flag checked at the top of every frame
///
/// The host keeps a clone and consults it before scheduling the next frame
/// callback; revoking it stops the driver at the next frame boundary.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    live: Rc<Cell<bool>>,
}

impl LivenessToken {
    pub(crate) fn new() -> Self {
        Self { live: Rc::new(Cell::new(true)) }
    }

    /// Whether the owning driver is still running
    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Ask the owning driver to stop at the next frame boundary
    pub fn revoke(&self) {
        self.live.set(false);
    }
}
