//! Floating particle field

use super::{Background, BackgroundKind};
use crate::config::ResolvedOptions;
use crate::entity::{Entity, EntityKind};
use crate::foundation::math::{Axis, Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;
use std::f32::consts::TAU;

const FIELD_SIZE: f32 = 1000.0;
const RISE_SPEED: (f32, f32) = (5.0, 30.0);
const SIDE_SPEED: f32 = 12.0;
const BOB_AMPLITUDE: f32 = 8.0;

/// Slowly rising dots that bob sideways and wrap at the edges
#[derive(Debug, Clone)]
pub struct Particles {
    options: ResolvedOptions,
    bounds: Bounds,
}

impl Particles {
    /// Create the variant
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            bounds: Bounds::planar(FIELD_SIZE, FIELD_SIZE, Axis::Y),
        }
    }
}

impl Background for Particles {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Particles
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Wrap
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        let velocity = Vec3::new(rng.signed(SIDE_SPEED), rng.range(RISE_SPEED.0, RISE_SPEED.1), 0.0);
        Entity::new(EntityKind::Particle, rng.point_in(&self.bounds))
            .with_velocity(velocity)
            .with_phase(rng.range(0.0, TAU), rng.range(0.5, 2.0))
            .with_drift(Vec3::new(BOB_AMPLITUDE * self.options.density, 0.0, 0.0))
            .with_heat(rng.range(0.2, 1.0) * self.options.glow_intensity, 0.0)
            .with_size(self.options.pixel_size * rng.range(0.5, 1.5))
    }
}
