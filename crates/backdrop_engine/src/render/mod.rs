//! Render step seam
//!
//! The scene loop does not know how entities are drawn. It hands a
//! [`FrameView`] to whatever [`Surface`] the embedding view supplied. A
//! surface only has to accept draw calls and report its pixel size; it may
//! also report that it has become unavailable (context lost, container
//! gone), which the driver checks before every frame.
//!
//! Two surfaces ship with the engine:
//! - [`HeadlessSurface`]: records what it was asked to draw (tests, servers)
//! - [`TextSurface`]: rasterizes entities into a character grid

mod headless;
mod text;

pub use headless::{HeadlessSurface, SurfaceLossSwitch, SurfaceRecord};
pub use text::TextSurface;

use crate::assets::Palette;
use crate::config::Rgba;
use crate::entity::Entity;
use crate::foundation::math::Bounds;
use thiserror::Error;

/// Surface errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The drawable target could not be obtained
    #[error("surface unavailable: {0}")]
    Unavailable(String),

    /// The drawable target went away while in use
    #[error("surface lost")]
    Lost,

    /// A draw call failed for another reason
    #[error("draw failed: {0}")]
    DrawFailed(String),
}

/// Current pixel dimensions of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    /// Width in pixels / cells
    pub width: u32,
    /// Height in pixels / cells
    pub height: u32,
}

impl SurfaceSize {
    /// Create a size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Everything a surface needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Entities in pool order; inactive ones are included and must be skipped
    pub entities: &'a [Entity],
    /// World-space bounds the entities live in
    pub bounds: &'a Bounds,
    /// Base color
    pub color: Rgba,
    /// Shades available for heat / depth modulation
    pub palette: &'a Palette,
    /// Glow strength in `[0, 1]`
    pub glow: f32,
    /// Simulated seconds since the scene started
    pub elapsed: f32,
    /// Running score
    pub score: u64,
    /// Frame index, starting at zero
    pub frame: u64,
}

impl FrameView<'_> {
    /// Entities that should be drawn
    pub fn visible(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(|entity| entity.is_active())
    }
}

/// A drawable target owned by exactly one driver at a time
pub trait Surface {
    /// Current dimensions
    fn size(&self) -> SurfaceSize;

    /// Whether the surface can still accept draw calls
    fn is_available(&self) -> bool;

    /// Draw one frame
    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), SurfaceError>;

    /// Adopt new dimensions; must be idempotent
    fn resize(&mut self, size: SurfaceSize);

    /// Release backend resources
    ///
    /// The driver calls this at most once per surface.
    fn release(&mut self);
}
