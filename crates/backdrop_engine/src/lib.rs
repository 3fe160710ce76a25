//! # Backdrop Engine
//!
//! A per-frame scene loop for animated decorative backgrounds.
//!
//! ## Features
//!
//! - **Object Pool**: fixed-size, generation-tagged entity storage
//! - **Update Step**: delta-time scaled motion, phase, heat and rotation
//! - **Collection Check**: distance-threshold pickups with isolated callbacks
//! - **Scene Driver**: explicit lifecycle, liveness token, idempotent teardown
//! - **Variants**: particles, rain, meteors, clouds, waves, heartbeat, runner, cyber world
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use backdrop_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let assets = AssetCache::with_builtin()?;
//!     let config = SceneConfig::for_kind(BackgroundKind::Runner);
//!
//!     let mut handle = SceneDriver::new(config, assets)
//!         .start(|config, _| Ok(HeadlessSurface::new(config.width, config.height)))?;
//!     handle.on_collect(|event| {
//!         log::info!("collected {} worth {}", event.kind, event.value);
//!         Ok(())
//!     });
//!
//!     FrameLoop::new(60).run_simulated(&mut handle, 600, 1.0 / 60.0);
//!     handle.stop();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod foundation;
pub mod config;
pub mod entity;
pub mod pool;
pub mod update;
pub mod collision;
pub mod events;
pub mod assets;
pub mod render;
pub mod backgrounds;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetCache, AssetError, GlyphRamp, Palette},
        backgrounds::{build_background, Background, BackgroundKind},
        collision::{CollectError, CollectionCheck, CollectionEvent, CollectionReport},
        config::{BackgroundOptions, Config, ConfigError, ResolvedOptions, Rgba, SceneConfig},
        entity::{Entity, EntityKind, EntityState},
        events::{EventHandler, EventType, SceneEvent},
        foundation::{
            math::{Axis, Bounds, Vec2, Vec3},
            random::SceneRng,
            time::FrameClock,
        },
        pool::{ObjectPool, PoolHandle, PoolStats},
        render::{FrameView, HeadlessSurface, Surface, SurfaceError, SurfaceSize, TextSurface},
        scene::{
            DriverError, DriverState, FrameLoop, FrameOutcome, FrameStats, LivenessToken, LoopSummary, Scene,
            SceneDriver, SceneHandle, StopReason,
        },
        update::{BoundsOutcome, BoundsPolicy},
    };
}
