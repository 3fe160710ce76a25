//! Drifting clouds

use super::{Background, BackgroundKind};
use crate::config::ResolvedOptions;
use crate::entity::{Entity, EntityKind};
use crate::foundation::math::{Axis, Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;
use std::f32::consts::TAU;

const SKY_WIDTH: f32 = 1000.0;
const SKY_HEIGHT: f32 = 400.0;
const DRIFT_SPEED: (f32, f32) = (10.0, 30.0);

/// Clouds sliding across the sky and wrapping around
#[derive(Debug, Clone)]
pub struct Clouds {
    options: ResolvedOptions,
    bounds: Bounds,
}

impl Clouds {
    /// Create the variant
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            bounds: Bounds::planar(SKY_WIDTH, SKY_HEIGHT, Axis::X),
        }
    }
}

impl Background for Clouds {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Clouds
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Wrap
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        // Upper clouds are farther away: smaller and slower
        let position = rng.point_in(&self.bounds);
        let depth = position.y / SKY_HEIGHT;
        let speed = rng.range(DRIFT_SPEED.0, DRIFT_SPEED.1) * (1.0 - 0.5 * depth);
        Entity::new(EntityKind::Cloud, position)
            .with_velocity(Vec3::new(speed, 0.0, 0.0))
            .with_phase(rng.range(0.0, TAU), rng.range(0.1, 0.3))
            .with_drift(Vec3::new(0.0, 4.0 * self.options.density, 0.0))
            .with_heat(self.options.glow_intensity, 0.0)
            .with_size(self.options.pixel_size * (1.0 - 0.4 * depth))
    }
}
