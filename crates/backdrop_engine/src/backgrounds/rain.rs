//! Falling diamonds

use super::{Background, BackgroundKind};
use crate::config::ResolvedOptions;
use crate::entity::{Entity, EntityKind};
use crate::foundation::math::{Axis, Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;
use std::f32::consts::TAU;

const FIELD_SIZE: f32 = 1000.0;
const FALL_SPEED: (f32, f32) = (200.0, 400.0);

/// Diamonds falling straight down, respawned at the top when they land
#[derive(Debug, Clone)]
pub struct Rain {
    options: ResolvedOptions,
    bounds: Bounds,
}

impl Rain {
    /// Create the variant
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            bounds: Bounds::planar(FIELD_SIZE, FIELD_SIZE, Axis::Y),
        }
    }

    fn diamond_at(&self, position: Vec3, rng: &mut SceneRng) -> Entity {
        // Denser rain also falls a little faster
        let speed = rng.range(FALL_SPEED.0, FALL_SPEED.1) * self.options.density.sqrt();
        Entity::new(EntityKind::Diamond, position)
            .with_velocity(Vec3::new(0.0, -speed, 0.0))
            .with_spin(rng.range(0.0, TAU), rng.signed(3.0))
            .with_heat(self.options.glow_intensity, 0.0)
            .with_size(self.options.pixel_size * rng.range(0.6, 1.4))
    }
}

impl Background for Rain {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Rain
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Respawn
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        let position = rng.point_in(&self.bounds);
        self.diamond_at(position, rng)
    }

    fn respawn(&self, rng: &mut SceneRng) -> Entity {
        let position = Vec3::new(rng.range(0.0, FIELD_SIZE), FIELD_SIZE, 0.0);
        self.diamond_at(position, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diamonds_fall() {
        let rain = Rain::new(ResolvedOptions::defaults_for(BackgroundKind::Rain));
        let mut rng = SceneRng::seeded(2);
        for _ in 0..50 {
            assert!(rain.spawn(&mut rng).velocity.y < 0.0);
            assert_eq!(rain.respawn(&mut rng).position.y, FIELD_SIZE);
        }
    }
}
