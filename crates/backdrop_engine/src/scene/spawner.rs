//! Probabilistic activation of dormant pool slots

use crate::entity::Entity;
use crate::foundation::random::SceneRng;
use crate::pool::{ObjectPool, PoolHandle};

/// Activates dormant entities at a steady average rate
///
/// The per-tick probability is `1 - e^(-rate * delta)`, so the expected
/// number of spawns per simulated second does not depend on the frame rate.
/// At most one slot is activated per check and the pool never grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawner {
    rate_per_second: f32,
}

impl Spawner {
    /// Create a spawner with the given average rate
    pub fn new(rate_per_second: f32) -> Self {
        Self {
            rate_per_second: if rate_per_second.is_finite() { rate_per_second.max(0.0) } else { 0.0 },
        }
    }

    /// Average activations per second
    pub fn rate(&self) -> f32 {
        self.rate_per_second
    }

    /// Probability of a spawn in a tick of `delta` seconds
    pub fn probability(&self, delta: f32) -> f32 {
        if delta <= 0.0 || !delta.is_finite() {
            return 0.0;
        }
        1.0 - (-self.rate_per_second * delta).exp()
    }

    /// Roll for a spawn and activate the first dormant slot on success
    pub fn tick(&self, pool: &mut ObjectPool<Entity>, rng: &mut SceneRng, delta: f32) -> Option<PoolHandle> {
        if !rng.chance(self.probability(delta)) {
            return None;
        }
        let index = pool.as_slice().iter().position(Entity::is_dormant)?;
        let handle = pool.handle_at(index)?;
        let activated = pool.get_mut(handle).is_some_and(Entity::activate);
        activated.then_some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn dormant_pool(count: usize) -> ObjectPool<Entity> {
        ObjectPool::create(count, |_| Entity::new(EntityKind::Meteor, Vec3::zeros()).dormant())
    }

    #[test]
    fn test_probability_is_delta_scaled() {
        let spawner = Spawner::new(2.0);
        assert_eq!(spawner.probability(0.0), 0.0);
        assert_relative_eq!(spawner.probability(0.5), 1.0 - (-1.0f32).exp());
        assert!(spawner.probability(0.032) > spawner.probability(0.016));
    }

    #[test]
    fn test_activates_in_creation_order_without_growth() {
        let spawner = Spawner::new(1.0e6);
        let mut pool = dormant_pool(3);
        let mut rng = SceneRng::seeded(1);

        let handles: Vec<_> = (0..5).filter_map(|_| spawner.tick(&mut pool, &mut rng, 1.0)).collect();
        assert_eq!(handles.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(pool.len(), 3);
        assert!(pool.as_slice().iter().all(Entity::is_active));
    }

    #[test]
    fn test_average_rate() {
        let spawner = Spawner::new(2.0);
        let mut pool = dormant_pool(4096);
        let mut rng = SceneRng::seeded(99);
        // 100 simulated seconds at 60 fps
        let spawned = (0..6000).filter(|_| spawner.tick(&mut pool, &mut rng, 1.0 / 60.0).is_some()).count();
        assert!((150..250).contains(&spawned), "spawned {spawned}");
    }
}
