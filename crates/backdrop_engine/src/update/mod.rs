//! Per-entity update step
//!
//! Everything here is a pure function of one entity and a time delta. All
//! quantities scale with the delta, so two half-length ticks land where one
//! full-length tick does (modulo the sinusoidal drift term).

use crate::entity::Entity;
use crate::foundation::math::{wrap_phase, Axis, Bounds};
use serde::{Deserialize, Serialize};

/// What to do with an entity that leaves its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Re-enter from the opposite side (toroidal)
    Wrap,
    /// Replace with a fresh spawn once the primary axis is exceeded
    Respawn,
}

/// Result of a bounds check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsOutcome {
    /// Entity is in range; nothing changed
    Inside,
    /// Entity was wrapped back into range
    Wrapped,
    /// Entity must be recycled by the pool
    Recycle,
}

/// Advance one entity by `delta` seconds
///
/// Only active entities move. Returns `true` when the entity was advanced.
/// Negative or non-finite deltas are ignored.
pub fn step(entity: &mut Entity, delta: f32) -> bool {
    if !entity.is_active() || !delta.is_finite() || delta <= 0.0 {
        return false;
    }

    let previous_phase = entity.phase;
    let next_phase = previous_phase + entity.phase_rate * delta;

    entity.position += entity.velocity * delta;
    if entity.drift != crate::foundation::math::Vec3::zeros() {
        // Offset by the change in the bob curve so the base path stays linear
        entity.position += entity.drift * (next_phase.sin() - previous_phase.sin());
    }

    entity.phase = wrap_phase(next_phase);
    entity.heat = (entity.heat - entity.heat_decay * delta).max(0.0);
    entity.rotation = wrap_phase(entity.rotation + entity.rotation_speed * delta);
    true
}

/// Apply the bounds policy to an active entity
pub fn apply_bounds(entity: &mut Entity, bounds: &Bounds, policy: BoundsPolicy) -> BoundsOutcome {
    if !entity.is_active() || bounds.contains(&entity.position) {
        return BoundsOutcome::Inside;
    }

    match policy {
        BoundsPolicy::Wrap => {
            entity.position = bounds.wrap(&entity.position);
            BoundsOutcome::Wrapped
        }
        BoundsPolicy::Respawn => {
            if !bounds.contains_primary(&entity.position) {
                return BoundsOutcome::Recycle;
            }
            // Off the side but still travelling: wrap the secondary axes only
            let primary = bounds.primary_axis;
            let wrapped = bounds.wrap(&entity.position);
            for axis in [Axis::X, Axis::Y, Axis::Z] {
                if axis != primary {
                    entity.position[axis.index()] = wrapped[axis.index()];
                }
            }
            BoundsOutcome::Wrapped
        }
    }
}
