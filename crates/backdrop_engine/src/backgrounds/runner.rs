//! Endless runner collectibles

use super::{Background, BackgroundKind};
use crate::config::ResolvedOptions;
use crate::entity::{Entity, EntityKind};
use crate::foundation::math::{Axis, Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;
use std::f32::consts::TAU;

const TRACK_HALF_WIDTH: f32 = 10.0;
const TRACK_HEIGHT: f32 = 4.0;
const TRACK_DEPTH: f32 = 120.0;
/// Collectibles first appear this far down the track
const SPAWN_NEAR: f32 = 20.0;
const APPROACH_SPEED: (f32, f32) = (15.0, 25.0);
const PLAYER_HEIGHT: f32 = 1.0;
const PLAYER_DEPTH: f32 = 2.0;
const PLAYER_SWEEP: f32 = 6.0;
const PLAYER_SWEEP_RATE: f32 = 0.8;
const PICKUP_RADIUS: f32 = 2.5;
const GEM_CHANCE: f32 = 0.2;
const GEM_VALUE: u32 = 10;
const COIN_VALUE: u32 = 1;

/// Coins and gems rushing toward a player who strafes across the track
#[derive(Debug, Clone)]
pub struct Runner {
    options: ResolvedOptions,
    bounds: Bounds,
}

impl Runner {
    /// Create the variant
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            bounds: Bounds::new(
                Vec3::new(-TRACK_HALF_WIDTH, 0.0, 0.0),
                Vec3::new(TRACK_HALF_WIDTH, TRACK_HEIGHT, TRACK_DEPTH),
                Axis::Z,
            ),
        }
    }

    fn collectible_at(&self, depth: f32, rng: &mut SceneRng) -> Entity {
        let position = Vec3::new(
            rng.range(-TRACK_HALF_WIDTH, TRACK_HALF_WIDTH),
            rng.range(0.5, TRACK_HEIGHT - 0.5),
            depth,
        );
        let value = if rng.chance(GEM_CHANCE) { GEM_VALUE } else { COIN_VALUE };
        Entity::new(EntityKind::Collectible, position)
            .with_velocity(Vec3::new(0.0, 0.0, -rng.range(APPROACH_SPEED.0, APPROACH_SPEED.1)))
            .with_spin(rng.range(0.0, TAU), 2.0)
            .with_phase(rng.range(0.0, TAU), 3.0)
            .with_drift(Vec3::new(0.0, 0.25, 0.0))
            .with_heat(self.options.glow_intensity, 0.0)
            .with_size(self.options.pixel_size)
            .with_value(value)
    }
}

impl Background for Runner {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Runner
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Respawn
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        let depth = rng.range(SPAWN_NEAR, TRACK_DEPTH);
        self.collectible_at(depth, rng)
    }

    fn respawn(&self, rng: &mut SceneRng) -> Entity {
        self.collectible_at(TRACK_DEPTH, rng)
    }

    fn collect_threshold(&self) -> Option<f32> {
        Some(PICKUP_RADIUS)
    }

    fn reference_point(&self, elapsed: f32) -> Option<Vec3> {
        let x = (elapsed * PLAYER_SWEEP_RATE).sin() * PLAYER_SWEEP;
        Some(Vec3::new(x, PLAYER_HEIGHT, PLAYER_DEPTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_stays_on_track() {
        let runner = Runner::new(ResolvedOptions::defaults_for(BackgroundKind::Runner));
        for step in 0..1000 {
            let player = runner.reference_point(step as f32 * 0.05).unwrap();
            assert!(runner.bounds().contains(&player));
        }
    }

    #[test]
    fn test_respawn_at_far_end() {
        let runner = Runner::new(ResolvedOptions::defaults_for(BackgroundKind::Runner));
        let mut rng = SceneRng::seeded(8);
        let fresh = runner.respawn(&mut rng);
        assert_eq!(fresh.position.z, TRACK_DEPTH);
        assert!(fresh.velocity.z < 0.0);
        assert!(fresh.value == GEM_VALUE || fresh.value == COIN_VALUE);
    }
}
