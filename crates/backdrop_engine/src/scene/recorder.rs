//! Per-tick position log

use crate::entity::{Entity, EntityState};
use crate::foundation::math::Vec3;
use crate::pool::{ObjectPool, PoolHandle};
use std::collections::VecDeque;

/// One entity in one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySample {
    /// Spawn handle
    pub handle: PoolHandle,
    /// Position after the tick
    pub position: Vec3,
    /// Lifecycle state after the tick
    pub state: EntityState,
}

/// Pool snapshot after one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickSample {
    /// Tick index, starting at zero
    pub tick: u64,
    /// Reference point used by the collection check this tick
    pub reference: Option<Vec3>,
    /// Every entity, in pool order
    pub entities: Vec<EntitySample>,
}

/// Bounded log of tick samples
///
/// Lets tests and tools re-run the collection distance check against what
/// actually happened, independently of the live check.
#[derive(Debug, Clone)]
pub struct PositionLog {
    samples: VecDeque<TickSample>,
    limit: usize,
}

impl PositionLog {
    /// Keep at most `limit` ticks, dropping the oldest
    pub fn with_limit(limit: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(limit.min(4096)),
            limit: limit.max(1),
        }
    }

    /// Append the state of `pool` after tick `tick`
    pub fn record(&mut self, tick: u64, reference: Option<Vec3>, pool: &ObjectPool<Entity>) {
        if self.samples.len() == self.limit {
            self.samples.pop_front();
        }
        let entities = pool
            .iter()
            .map(|(handle, entity)| EntitySample {
                handle,
                position: entity.position,
                state: entity.state(),
            })
            .collect();
        self.samples.push_back(TickSample { tick, reference, entities });
    }

    /// Recorded ticks, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &TickSample> + '_ {
        self.samples.iter()
    }

    /// Number of recorded ticks
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Handles whose collected flag is not backed by a logged approach
    ///
    /// For every collected spawn, some sample of that same spawn (same
    /// handle, at or before the collection tick) must sit closer than
    /// `threshold` to that tick's reference point. An empty result means the
    /// log is consistent.
    pub fn unexplained_collections(&self, threshold: f32) -> Vec<PoolHandle> {
        let mut explained: Vec<PoolHandle> = Vec::new();
        let mut unexplained: Vec<PoolHandle> = Vec::new();

        for sample in &self.samples {
            for entity in &sample.entities {
                let close = sample
                    .reference
                    .is_some_and(|reference| (entity.position - reference).norm() < threshold);
                if close && !explained.contains(&entity.handle) {
                    explained.push(entity.handle);
                }
                if entity.state == EntityState::Collected
                    && !explained.contains(&entity.handle)
                    && !unexplained.contains(&entity.handle)
                {
                    unexplained.push(entity.handle);
                }
            }
        }
        unexplained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    #[test]
    fn test_limit_drops_oldest() {
        let pool = ObjectPool::create(2, |_| Entity::new(EntityKind::Particle, Vec3::zeros()));
        let mut log = PositionLog::with_limit(3);
        for tick in 0..5 {
            log.record(tick, None, &pool);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.samples().next().map(|s| s.tick), Some(2));
    }

    #[test]
    fn test_flags_collection_without_approach() {
        let mut pool = ObjectPool::create(1, |_| Entity::new(EntityKind::Collectible, Vec3::new(50.0, 0.0, 0.0)));
        pool.for_each(|_, entity| {
            entity.mark_collected();
        });

        let mut log = PositionLog::with_limit(10);
        log.record(0, Some(Vec3::zeros()), &pool);
        assert_eq!(log.unexplained_collections(2.0).len(), 1);
        assert!(log.unexplained_collections(100.0).is_empty());
    }
}
