//! Background variants
//!
//! Every background runs the same scene loop; what differs is the math for
//! a single entity: where it spawns, how it moves, what happens when it
//! leaves the visible area and whether the player can collect it. A variant
//! implements [`Background`] and nothing else.
//!
//! | Variant        | Travel axis | Out of bounds | Spawning      | Collection |
//! |----------------|-------------|---------------|---------------|------------|
//! | `particles`    | y (up)      | wrap          | all at start  | no         |
//! | `rain`         | y (down)    | respawn top   | all at start  | no         |
//! | `meteors`      | y (down)    | respawn       | probabilistic | no         |
//! | `clouds`       | x           | wrap          | all at start  | no         |
//! | `waves`        | x           | wrap          | all at start  | no         |
//! | `heartbeat`    | x (left)    | wrap + pulse  | all at start  | no         |
//! | `runner`       | z (toward)  | respawn far   | all at start  | yes        |
//! | `cyber_world`  | z (toward)  | wrap          | all at start  | no         |

mod clouds;
mod cyber_world;
mod heartbeat;
mod meteors;
mod particles;
mod rain;
mod runner;
mod waves;

pub use clouds::Clouds;
pub use cyber_world::CyberWorld;
pub use heartbeat::Heartbeat;
pub use meteors::Meteors;
pub use particles::Particles;
pub use rain::Rain;
pub use runner::Runner;
pub use waves::Waves;

use crate::config::ResolvedOptions;
use crate::entity::Entity;
use crate::foundation::math::{Bounds, Vec3};
use crate::foundation::random::SceneRng;
use crate::update::BoundsPolicy;
use serde::{Deserialize, Serialize};

/// Background variant selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    /// Floating particle field
    #[default]
    Particles,
    /// Falling diamonds
    Rain,
    /// Pixel meteors with fading trails
    Meteors,
    /// Drifting clouds
    Clouds,
    /// Undulating wave lines
    Waves,
    /// Scrolling heartbeat trace
    Heartbeat,
    /// Endless runner with collectibles
    Runner,
    /// Tumbling asteroid field
    CyberWorld,
}

impl BackgroundKind {
    /// Every variant, in declaration order
    pub const ALL: [Self; 8] = [
        Self::Particles,
        Self::Rain,
        Self::Meteors,
        Self::Clouds,
        Self::Waves,
        Self::Heartbeat,
        Self::Runner,
        Self::CyberWorld,
    ];

    /// Config-file name of the variant
    pub const fn name(self) -> &'static str {
        match self {
            Self::Particles => "particles",
            Self::Rain => "rain",
            Self::Meteors => "meteors",
            Self::Clouds => "clouds",
            Self::Waves => "waves",
            Self::Heartbeat => "heartbeat",
            Self::Runner => "runner",
            Self::CyberWorld => "cyber_world",
        }
    }
}

impl std::fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-entity math of one background variant
pub trait Background {
    /// Which variant this is
    fn kind(&self) -> BackgroundKind;

    /// World-space bounds entities live in
    fn bounds(&self) -> &Bounds;

    /// What happens at the bounds
    fn policy(&self) -> BoundsPolicy;

    /// Build an entity for the initial pool fill
    fn spawn(&self, rng: &mut SceneRng) -> Entity;

    /// Build the replacement for a recycled entity
    ///
    /// Defaults to a regular spawn.
    fn respawn(&self, rng: &mut SceneRng) -> Entity {
        self.spawn(rng)
    }

    /// Dormant-slot activation rate per second, if the variant spawns lazily
    fn spawn_rate(&self) -> Option<f32> {
        None
    }

    /// Collection radius, if entities can be collected
    fn collect_threshold(&self) -> Option<f32> {
        None
    }

    /// Player / camera position at `elapsed` seconds
    fn reference_point(&self, _elapsed: f32) -> Option<Vec3> {
        None
    }

    /// Whether collected entities are replaced by fresh spawns
    fn recycle_collected(&self) -> bool {
        true
    }

    /// Hook run after an entity wrapped around the bounds
    fn on_wrapped(&self, _entity: &mut Entity, _rng: &mut SceneRng) {}
}

/// Build the variant selected by `kind`
pub fn build_background(kind: BackgroundKind, options: ResolvedOptions) -> Box<dyn Background> {
    match kind {
        BackgroundKind::Particles => Box::new(Particles::new(options)),
        BackgroundKind::Rain => Box::new(Rain::new(options)),
        BackgroundKind::Meteors => Box::new(Meteors::new(options)),
        BackgroundKind::Clouds => Box::new(Clouds::new(options)),
        BackgroundKind::Waves => Box::new(Waves::new(options)),
        BackgroundKind::Heartbeat => Box::new(Heartbeat::new(options)),
        BackgroundKind::Runner => Box::new(Runner::new(options)),
        BackgroundKind::CyberWorld => Box::new(CyberWorld::new(options)),
    }
}
