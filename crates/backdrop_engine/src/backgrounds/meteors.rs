//! Pixel meteors with cooling trails

use super::{Background, BackgroundKind};
use crate::config::ResolvedOptions;
use crate::entity::{Entity, EntityKind};
use crate::foundation::math::{Axis, Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;

const FIELD_SIZE: f32 = 1000.0;
const HORIZONTAL_SPEED: (f32, f32) = (150.0, 250.0);
const FALL_SPEED: (f32, f32) = (300.0, 500.0);
const COOLING_RATE: f32 = 0.8;
const BASE_SPAWN_RATE: f32 = 2.0;

/// Meteors that streak diagonally and cool as they fall
///
/// The pool starts dormant; the spawner lights meteors up at random, and a
/// meteor that leaves the sky goes back to sleep at the top edge.
#[derive(Debug, Clone)]
pub struct Meteors {
    options: ResolvedOptions,
    bounds: Bounds,
}

impl Meteors {
    /// Create the variant
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            bounds: Bounds::planar(FIELD_SIZE, FIELD_SIZE, Axis::Y),
        }
    }

    fn meteor(&self, rng: &mut SceneRng) -> Entity {
        let position = Vec3::new(rng.range(0.0, FIELD_SIZE), FIELD_SIZE, 0.0);
        let velocity = Vec3::new(
            -rng.range(HORIZONTAL_SPEED.0, HORIZONTAL_SPEED.1),
            -rng.range(FALL_SPEED.0, FALL_SPEED.1),
            0.0,
        );
        Entity::new(EntityKind::Meteor, position)
            .with_velocity(velocity)
            .with_heat(1.0, COOLING_RATE)
            .with_size(self.options.pixel_size)
            .dormant()
    }
}

impl Background for Meteors {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Meteors
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Respawn
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        self.meteor(rng)
    }

    fn spawn_rate(&self) -> Option<f32> {
        Some(BASE_SPAWN_RATE * self.options.density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meteors_start_dormant_and_hot() {
        let meteors = Meteors::new(ResolvedOptions::defaults_for(BackgroundKind::Meteors));
        let mut rng = SceneRng::seeded(9);
        let meteor = meteors.spawn(&mut rng);
        assert!(meteor.is_dormant());
        assert_eq!(meteor.heat, 1.0);
        assert!(meteor.velocity.x < 0.0 && meteor.velocity.y < 0.0);
        assert!(meteors.respawn(&mut rng).is_dormant());
    }
}
