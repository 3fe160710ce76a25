//! Proximity collection check
//!
//! Each tick the scene tests a single reference point (camera or player)
//! against every active entity. An entity closer than the threshold flips
//! to collected and the caller's callback fires once for it.
//!
//! Callback failures are isolated per entity: an `Err` return or a panic is
//! logged and counted, and the check moves on to the next entity.

use crate::entity::{Entity, EntityKind};
use crate::foundation::math::Vec3;
use crate::pool::{ObjectPool, PoolHandle};
use std::panic::{catch_unwind, AssertUnwindSafe};
use thiserror::Error;

/// One-shot record of an entity being collected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionEvent {
    /// Handle of the collected spawn
    pub handle: PoolHandle,
    /// Entity category
    pub kind: EntityKind,
    /// Points carried by the entity
    pub value: u32,
    /// Distance to the reference point at collection time
    pub distance: f32,
}

/// Error a collection callback may return
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// The callback rejected the event
    #[error("collection callback failed: {0}")]
    Callback(String),

    /// The callback panicked
    #[error("collection callback panicked: {0}")]
    Panicked(String),
}

/// Outcome of one collection pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionReport {
    /// Events produced this pass, in pool order
    pub events: Vec<CollectionEvent>,
    /// Callback failures that were isolated
    pub failures: Vec<(PoolHandle, CollectError)>,
}

impl CollectionReport {
    /// Number of entities collected this pass
    pub fn collected(&self) -> usize {
        self.events.len()
    }

    /// Total points collected this pass
    pub fn points(&self) -> u64 {
        self.events.iter().map(|event| u64::from(event.value)).sum()
    }
}

/// Distance-threshold collection check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionCheck {
    threshold: f32,
}

impl CollectionCheck {
    /// Create a check with the given threshold (world units)
    pub fn new(threshold: f32) -> Self {
        Self { threshold: threshold.max(0.0) }
    }

    /// Collection radius
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether a point at `position` is within reach of `reference`
    pub fn in_reach(&self, reference: &Vec3, position: &Vec3) -> bool {
        (position - reference).norm() < self.threshold
    }

    /// Test every active entity against `reference`
    ///
    /// Collected and dormant entities are skipped, so running the check
    /// twice in one tick never reports an entity twice.
    pub fn run<F>(&self, reference: &Vec3, pool: &mut ObjectPool<Entity>, mut on_collect: F) -> CollectionReport
    where
        F: FnMut(&CollectionEvent) -> Result<(), CollectError>,
    {
        let mut report = CollectionReport::default();

        pool.for_each(|handle, entity| {
            if !entity.is_active() {
                return;
            }
            let distance = (entity.position - reference).norm();
            if distance >= self.threshold || !entity.mark_collected() {
                return;
            }

            let event = CollectionEvent {
                handle,
                kind: entity.kind,
                value: entity.value,
                distance,
            };
            log::trace!("Collected {} {:?} at distance {:.3}", event.kind, handle, distance);

            if let Err(error) = isolate(|| on_collect(&event)) {
                log::warn!("Isolated collection callback failure for {:?}: {}", handle, error);
                report.failures.push((handle, error));
            }
            report.events.push(event);
        });

        report
    }
}

/// Run a caller-supplied callback, turning a panic into [`CollectError::Panicked`]
pub(crate) fn isolate<F>(callback: F) -> Result<(), CollectError>
where
    F: FnOnce() -> Result<(), CollectError>,
{
    catch_unwind(AssertUnwindSafe(callback))
        .unwrap_or_else(|payload| Err(CollectError::Panicked(panic_message(payload.as_ref()))))
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_pool() -> ObjectPool<Entity> {
        // Collectibles at z = 0, 1, 2, ... 9 with value = index + 1
        ObjectPool::create(10, |i| {
            Entity::new(EntityKind::Collectible, Vec3::new(0.0, 0.0, i as f32)).with_value(i as u32 + 1)
        })
    }

    #[test]
    fn test_collects_within_threshold() {
        let mut pool = line_pool();
        let check = CollectionCheck::new(2.5);
        let mut seen = Vec::new();

        let report = check.run(&Vec3::zeros(), &mut pool, |event| {
            seen.push(event.value);
            Ok(())
        });

        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(report.collected(), 3);
        assert_eq!(report.points(), 6);
        assert!(pool.as_slice()[..3].iter().all(Entity::is_collected));
        assert!(pool.as_slice()[3..].iter().all(Entity::is_active));
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut pool = line_pool();
        let check = CollectionCheck::new(2.5);
        let mut calls = 0;

        check.run(&Vec3::zeros(), &mut pool, |_| {
            calls += 1;
            Ok(())
        });
        let second = check.run(&Vec3::zeros(), &mut pool, |_| {
            calls += 1;
            Ok(())
        });

        assert_eq!(calls, 3);
        assert_eq!(second.collected(), 0);
    }

    #[test]
    fn test_callback_failures_are_isolated() {
        let mut pool = line_pool();
        let check = CollectionCheck::new(4.5);
        let mut delivered = Vec::new();

        let report = check.run(&Vec3::zeros(), &mut pool, |event| {
            match event.value {
                2 => Err(CollectError::Callback("score service busy".to_string())),
                3 => panic!("callback exploded"),
                value => {
                    delivered.push(value);
                    Ok(())
                }
            }
        });

        assert_eq!(delivered, vec![1, 4, 5]);
        assert_eq!(report.collected(), 5);
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(report.failures[1].1, CollectError::Panicked(ref msg) if msg.contains("exploded")));
    }

    #[test]
    fn test_dormant_entities_are_ignored() {
        let mut pool = ObjectPool::create(1, |_| Entity::new(EntityKind::Collectible, Vec3::zeros()).dormant());
        let report = CollectionCheck::new(1.0).run(&Vec3::zeros(), &mut pool, |_| Ok(()));
        assert_eq!(report.collected(), 0);
        assert!(pool.as_slice()[0].is_dormant());
    }
}
