//! Stationary wave lines

use super::{Background, BackgroundKind};
use crate::config::ResolvedOptions;
use crate::entity::{Entity, EntityKind};
use crate::foundation::math::{Axis, Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;
use std::f32::consts::TAU;

const FIELD_WIDTH: f32 = 1000.0;
const FIELD_HEIGHT: f32 = 400.0;
const AMPLITUDE: f32 = 40.0;

/// Horizontal lines whose crests roll by phase alone
///
/// Lines never travel; each entity is the anchor of one line and its phase
/// drives the vertical swing that a renderer turns into a sine curve.
#[derive(Debug, Clone)]
pub struct Waves {
    options: ResolvedOptions,
    bounds: Bounds,
}

impl Waves {
    /// Create the variant
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            bounds: Bounds::planar(FIELD_WIDTH, FIELD_HEIGHT, Axis::X),
        }
    }
}

impl Background for Waves {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Waves
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Wrap
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        let amplitude = (AMPLITUDE * self.options.density).min(FIELD_HEIGHT * 0.25);
        // Keep the baseline far enough from the edges that the swing stays inside
        let baseline = rng.range(amplitude, FIELD_HEIGHT - amplitude);
        let phase = rng.range(0.0, TAU);
        let position = Vec3::new(FIELD_WIDTH * 0.5, baseline + amplitude * phase.sin(), 0.0);
        Entity::new(EntityKind::WaveLine, position)
            .with_phase(phase, rng.range(1.0, 2.0))
            .with_drift(Vec3::new(0.0, amplitude, 0.0))
            .with_heat(self.options.glow_intensity, 0.0)
            .with_size(self.options.pixel_size)
    }
}
