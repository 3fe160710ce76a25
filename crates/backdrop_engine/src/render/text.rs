//! Character-grid surface

use super::{FrameView, Surface, SurfaceError, SurfaceSize};
use crate::assets::GlyphRamp;
use crate::foundation::math::Axis;
use std::sync::Arc;

/// Surface that rasterizes entities into rows of glyphs
///
/// World `x` maps to columns and world `y` to rows (up is up). When the
/// bounds have depth, far entities use fainter glyphs.
#[derive(Debug)]
pub struct TextSurface {
    size: SurfaceSize,
    ramp: Option<Arc<GlyphRamp>>,
    cells: Vec<char>,
    levels: Vec<f32>,
    background: char,
}

impl TextSurface {
    /// Create a grid of `width` x `height` cells
    pub fn new(width: u32, height: u32, ramp: Arc<GlyphRamp>) -> Self {
        let size = SurfaceSize::new(width, height);
        let area = (width as usize) * (height as usize);
        Self {
            size,
            ramp: Some(ramp),
            cells: vec![' '; area],
            levels: vec![-1.0; area],
            background: ' ',
        }
    }

    /// Character used for empty cells
    pub fn with_background(mut self, background: char) -> Self {
        self.background = background;
        self.cells.fill(background);
        self
    }

    /// Most recent frame as newline-separated rows
    pub fn to_text(&self) -> String {
        let width = self.size.width as usize;
        if width == 0 {
            return String::new();
        }
        self.cells
            .chunks(width)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of non-background cells in the most recent frame
    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c != self.background).count()
    }

    /// Cell under a grid coordinate
    ///
    /// Coordinates on the far edge of the grid (`column == width` or
    /// `row == height`) belong to the last cell, so entities sitting exactly
    /// on `bounds.max.x` or `bounds.min.y` stay visible.
    fn cell_index(&self, column: f32, row: f32) -> Option<usize> {
        let (width, height) = (self.size.width as usize, self.size.height as usize);
        if width == 0 || height == 0 || !(column.is_finite() && row.is_finite()) {
            return None;
        }
        if column < 0.0 || row < 0.0 || column > width as f32 || row > height as f32 {
            return None;
        }
        let column = (column as usize).min(width - 1);
        let row = (row as usize).min(height - 1);
        Some(row * width + column)
    }
}

impl Surface for TextSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn is_available(&self) -> bool {
        self.ramp.is_some() && !self.size.is_empty()
    }

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), SurfaceError> {
        let ramp = self.ramp.clone().ok_or(SurfaceError::Lost)?;
        self.cells.fill(self.background);
        self.levels.fill(-1.0);

        let bounds = frame.bounds;
        let span_x = bounds.extent(Axis::X).max(f32::EPSILON);
        let span_y = bounds.extent(Axis::Y).max(f32::EPSILON);
        let span_z = bounds.extent(Axis::Z);
        let (width, height) = (self.size.width as f32, self.size.height as f32);

        for entity in frame.visible() {
            let column = (entity.position.x - bounds.min.x) / span_x * width;
            let row = (1.0 - (entity.position.y - bounds.min.y) / span_y) * height;

            let mut intensity = entity.heat.max(frame.glow * 0.6);
            if span_z > 0.0 {
                let depth = ((entity.position.z - bounds.min.z) / span_z).clamp(0.0, 1.0);
                intensity *= 1.0 - depth * 0.7;
            }

            // Brighter entity wins when two share a cell
            if let Some(index) = self.cell_index(column, row) {
                if intensity > self.levels[index] {
                    self.levels[index] = intensity;
                    self.cells[index] = ramp.glyph_for(intensity);
                }
            }
        }
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        let area = (size.width as usize) * (size.height as usize);
        self.size = size;
        self.cells = vec![self.background; area];
        self.levels = vec![-1.0; area];
    }

    fn release(&mut self) {
        self.ramp = None;
        self.cells = Vec::new();
        self.levels = Vec::new();
    }
}
