//! Simulated scene entities and their lifecycle
//!
//! An [`Entity`] is one particle, diamond, meteor, cloud, collectible or
//! asteroid inside a background's pool. Its lifecycle is deliberately tiny:
//!
//! ```text
//! Dormant --activate--> Active --mark_collected--> Collected
//! ```
//!
//! `Collected` is terminal for that spawn. The pool may later recycle the
//! slot, which installs a brand new entity (new generation) rather than
//! reviving the collected one.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// What an entity represents visually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Floating dot
    Particle,
    /// Falling raindrop / diamond
    Diamond,
    /// Diagonal pixel meteor with a heat trail
    Meteor,
    /// Horizontally drifting cloud
    Cloud,
    /// One line of a wave field
    WaveLine,
    /// One sample point of a heartbeat trace
    TracePoint,
    /// Runner pickup worth points
    Collectible,
    /// Tumbling cyber-world asteroid
    Asteroid,
}

impl EntityKind {
    /// Lowercase display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Particle => "particle",
            Self::Diamond => "diamond",
            Self::Meteor => "meteor",
            Self::Cloud => "cloud",
            Self::WaveLine => "wave_line",
            Self::TracePoint => "trace_point",
            Self::Collectible => "collectible",
            Self::Asteroid => "asteroid",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Current state of an entity's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Allocated in the pool but not yet spawned into view
    Dormant,
    /// Updating and rendering normally
    Active,
    /// Consumed by a collection event; never updated again
    Collected,
}

/// One simulated visual object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Visual category
    pub kind: EntityKind,

    /// Position, mutated every frame (2D entities keep `z = 0`)
    pub position: Vec3,

    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Phase accumulator in radians, kept in `[0, 2π)`
    pub phase: f32,

    /// Phase advance in radians per second
    pub phase_rate: f32,

    /// Heat / glow level in `[0, 1]` used for trail fade and color shift
    pub heat: f32,

    /// Heat lost per second
    pub heat_decay: f32,

    /// Rotation in radians, kept in `[0, 2π)`
    pub rotation: f32,

    /// Rotation speed in radians per second
    pub rotation_speed: f32,

    /// Visual size
    pub size: f32,

    /// Points awarded when collected
    pub value: u32,

    /// Bobbing amplitude per axis, driven by `phase`
    pub drift: Vec3,

    state: EntityState,
}

impl Entity {
    /// Create an active, motionless entity at `position`
    pub fn new(kind: EntityKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            velocity: Vec3::zeros(),
            phase: 0.0,
            phase_rate: 0.0,
            heat: 0.0,
            heat_decay: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            size: 1.0,
            value: 0,
            drift: Vec3::zeros(),
            state: EntityState::Active,
        }
    }

    /// Set velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set phase and phase rate
    pub fn with_phase(mut self, phase: f32, phase_rate: f32) -> Self {
        self.phase = crate::foundation::math::wrap_phase(phase);
        self.phase_rate = phase_rate;
        self
    }

    /// Set heat and its decay rate
    pub fn with_heat(mut self, heat: f32, heat_decay: f32) -> Self {
        self.heat = heat.clamp(0.0, 1.0);
        self.heat_decay = heat_decay.max(0.0);
        self
    }

    /// Set rotation speed
    pub fn with_spin(mut self, rotation: f32, rotation_speed: f32) -> Self {
        self.rotation = crate::foundation::math::wrap_phase(rotation);
        self.rotation_speed = rotation_speed;
        self
    }

    /// Set size
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Set collection value
    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    /// Set bobbing amplitude
    pub fn with_drift(mut self, drift: Vec3) -> Self {
        self.drift = drift;
        self
    }

    /// Start the entity dormant (waiting for the spawner)
    pub fn dormant(mut self) -> Self {
        self.state = EntityState::Dormant;
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> EntityState {
        self.state
    }

    /// Whether the entity updates and renders
    pub fn is_active(&self) -> bool {
        self.state == EntityState::Active
    }

    /// Whether the entity is waiting to be spawned
    pub fn is_dormant(&self) -> bool {
        self.state == EntityState::Dormant
    }

    /// Whether the entity has been collected
    pub fn is_collected(&self) -> bool {
        self.state == EntityState::Collected
    }

    /// Move a dormant entity into view; returns `false` otherwise
    pub fn activate(&mut self) -> bool {
        if self.state == EntityState::Dormant {
            self.state = EntityState::Active;
            true
        } else {
            false
        }
    }

    /// Transition Active -> Collected
    ///
    /// Returns `true` only for the first transition. Dormant and already
    /// collected entities are left untouched.
    pub fn mark_collected(&mut self) -> bool {
        if self.state == EntityState::Active {
            self.state = EntityState::Collected;
            true
        } else {
            false
        }
    }
}
