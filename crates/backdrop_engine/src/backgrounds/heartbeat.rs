//! Scrolling heartbeat trace

use super::{Background, BackgroundKind};
use crate::config::ResolvedOptions;
use crate::entity::{Entity, EntityKind};
use crate::foundation::math::{Axis, Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;
use std::f32::consts::{PI, TAU};

const TRACE_WIDTH: f32 = 1000.0;
const TRACE_HEIGHT: f32 = 400.0;
const SCROLL_SPEED: f32 = 120.0;
const BEATS_PER_SECOND: f32 = 1.2;
/// Portion of the beat cycle (radians) during which the trace spikes
const SPIKE_WINDOW: f32 = 0.6;
const SPIKE_HEIGHT: f32 = TRACE_HEIGHT * 0.35;
const AFTERGLOW_DECAY: f32 = 1.5;

/// Trace points scrolling left; points re-entering on the right during a
/// beat are lifted into a spike and glow while they cool
///
/// All points share one beat clock: they start at phase zero with the same
/// phase rate, so `phase` is the time within the current beat.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    options: ResolvedOptions,
    bounds: Bounds,
}

impl Heartbeat {
    /// Create the variant
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            bounds: Bounds::planar(TRACE_WIDTH, TRACE_HEIGHT, Axis::X),
        }
    }

    /// Height above the baseline for a point entering at beat phase `phase`
    pub fn spike_offset(&self, phase: f32) -> f32 {
        if phase < SPIKE_WINDOW {
            (phase / SPIKE_WINDOW * PI).sin() * SPIKE_HEIGHT * self.options.density.min(1.0)
        } else {
            0.0
        }
    }
}

impl Background for Heartbeat {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Heartbeat
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Wrap
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        let position = Vec3::new(rng.range(0.0, TRACE_WIDTH), TRACE_HEIGHT * 0.5, 0.0);
        Entity::new(EntityKind::TracePoint, position)
            .with_velocity(Vec3::new(-SCROLL_SPEED, 0.0, 0.0))
            .with_phase(0.0, TAU * BEATS_PER_SECOND)
            .with_heat(0.0, AFTERGLOW_DECAY)
            .with_size(self.options.pixel_size)
    }

    fn on_wrapped(&self, entity: &mut Entity, _rng: &mut SceneRng) {
        let offset = self.spike_offset(entity.phase);
        entity.position.y = TRACE_HEIGHT * 0.5 + offset;
        entity.heat = if offset > 0.0 { 1.0 } else { self.options.glow_intensity * 0.5 };
    }
}
