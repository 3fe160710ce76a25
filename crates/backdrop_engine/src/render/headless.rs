//! Recording surface without a display

use super::{FrameView, Surface, SurfaceError, SurfaceSize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Snapshot of what a [`HeadlessSurface`] has been asked to do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceRecord {
    /// Frames drawn
    pub frames_drawn: u64,
    /// Visible entities in the most recent frame
    pub last_visible: usize,
    /// Score shown in the most recent frame
    pub last_score: u64,
    /// Resize calls received
    pub resizes: u32,
    /// Release calls received
    pub releases: u32,
}

/// Shared switch that simulates the host reclaiming the surface
///
/// Cloned handles observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLossSwitch {
    lost: Rc<Cell<bool>>,
}

impl SurfaceLossSwitch {
    /// Mark the surface as lost
    pub fn trigger(&self) {
        self.lost.set(true);
    }

    /// Whether the surface has been lost
    pub fn is_lost(&self) -> bool {
        self.lost.get()
    }
}

/// Surface that draws nothing and records every call
#[derive(Debug)]
pub struct HeadlessSurface {
    size: SurfaceSize,
    loss: SurfaceLossSwitch,
    record: Rc<RefCell<SurfaceRecord>>,
    fail_draws: bool,
}

impl HeadlessSurface {
    /// Create a surface with the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            loss: SurfaceLossSwitch::default(),
            record: Rc::new(RefCell::new(SurfaceRecord::default())),
            fail_draws: false,
        }
    }

    /// Make every draw call report [`SurfaceError::Lost`]
    pub fn failing_draws(mut self) -> Self {
        self.fail_draws = true;
        self
    }

    /// Switch that simulates surface loss
    pub fn loss_switch(&self) -> SurfaceLossSwitch {
        self.loss.clone()
    }

    /// Shared view of the recorded calls, readable after the surface moves
    pub fn recorder(&self) -> Rc<RefCell<SurfaceRecord>> {
        Rc::clone(&self.record)
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn is_available(&self) -> bool {
        !self.loss.is_lost() && !self.size.is_empty()
    }

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), SurfaceError> {
        if self.fail_draws || self.loss.is_lost() {
            return Err(SurfaceError::Lost);
        }
        let mut record = self.record.borrow_mut();
        record.frames_drawn += 1;
        record.last_visible = frame.visible().count();
        record.last_score = frame.score;
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.record.borrow_mut().resizes += 1;
    }

    fn release(&mut self) {
        self.record.borrow_mut().releases += 1;
    }
}
