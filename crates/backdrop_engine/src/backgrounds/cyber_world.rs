//! Tumbling asteroid field

use super::{Background, BackgroundKind};
use crate::config::ResolvedOptions;
use crate::entity::{Entity, EntityKind};
use crate::foundation::math::{Axis, Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;
use std::f32::consts::TAU;

const HALF_WIDTH: f32 = 50.0;
const HALF_HEIGHT: f32 = 30.0;
const DEPTH: f32 = 200.0;
const APPROACH_SPEED: (f32, f32) = (10.0, 30.0);
const SPIN_SPEED: f32 = 1.5;

/// Asteroids flying at the camera, spinning, and wrapping back to the far plane
#[derive(Debug, Clone)]
pub struct CyberWorld {
    options: ResolvedOptions,
    bounds: Bounds,
}

impl CyberWorld {
    /// Create the variant
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            bounds: Bounds::new(
                Vec3::new(-HALF_WIDTH, -HALF_HEIGHT, 0.0),
                Vec3::new(HALF_WIDTH, HALF_HEIGHT, DEPTH),
                Axis::Z,
            ),
        }
    }
}

impl Background for CyberWorld {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::CyberWorld
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Wrap
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        let velocity = Vec3::new(
            rng.signed(2.0),
            rng.signed(2.0),
            -rng.range(APPROACH_SPEED.0, APPROACH_SPEED.1),
        );
        Entity::new(EntityKind::Asteroid, rng.point_in(&self.bounds))
            .with_velocity(velocity)
            .with_spin(rng.range(0.0, TAU), rng.signed(SPIN_SPEED))
            .with_phase(rng.range(0.0, TAU), rng.range(0.2, 0.6))
            .with_drift(Vec3::new(1.0, 1.0, 0.0) * self.options.density)
            .with_heat(self.options.glow_intensity * rng.range(0.5, 1.0), 0.0)
            .with_size(self.options.pixel_size * rng.range(0.5, 2.0))
    }
}
