//! One background's pool advanced tick by tick, without any surface

use super::recorder::PositionLog;
use super::spawner::Spawner;
use crate::backgrounds::{build_background, Background};
use crate::collision::{CollectError, CollectionCheck, CollectionEvent, CollectionReport};
use crate::config::{ConfigError, SceneConfig};
use crate::entity::Entity;
use crate::foundation::math::Vec3;
use crate::foundation::random::SceneRng;
use crate::pool::{ObjectPool, PoolHandle};
use crate::update::{apply_bounds, step, BoundsOutcome};

/// Ticks kept by a position log unless the caller says otherwise
pub const DEFAULT_LOG_LIMIT: usize = 10_000;

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick index, starting at zero
    pub tick: u64,
    /// Delta the tick advanced by, after time scaling
    pub delta: f32,
    /// Dormant slot the spawner activated, if any
    pub spawned: Option<PoolHandle>,
    /// Entities that wrapped around the bounds
    pub wrapped: usize,
    /// Entities replaced by fresh spawns
    pub recycled: usize,
    /// Collection pass results
    pub collection: CollectionReport,
}

/// Pool, variant math and randomness for one running background
///
/// Each tick runs, in order:
/// 1. replace entities collected on the previous tick
/// 2. let the spawner activate a dormant slot
/// 3. advance every active entity and apply the bounds policy
/// 4. replace entities that left through a respawn edge
/// 5. run the collection check against the reference point
pub struct Scene {
    background: Box<dyn Background>,
    pool: ObjectPool<Entity>,
    rng: SceneRng,
    spawner: Option<Spawner>,
    check: Option<CollectionCheck>,
    elapsed: f32,
    ticks: u64,
    score: u64,
    log: Option<PositionLog>,
}

impl Scene {
    /// Fill a pool of `count` entities from `background`
    pub fn new(background: Box<dyn Background>, count: usize, seed: Option<u64>) -> Self {
        let mut rng = SceneRng::new(seed);
        let pool = ObjectPool::create(count, |_| background.spawn(&mut rng));
        let spawner = background.spawn_rate().map(Spawner::new);
        let check = background.collect_threshold().map(CollectionCheck::new);
        log::debug!(
            "Scene {} filled with {} entities (spawner: {}, collection: {})",
            background.kind(),
            pool.len(),
            spawner.is_some(),
            check.is_some()
        );

        Self {
            background,
            pool,
            rng,
            spawner,
            check,
            elapsed: 0.0,
            ticks: 0,
            score: 0,
            log: None,
        }
    }

    /// Build the configured variant
    pub fn from_config(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let options = config.resolved_options()?;
        let scene = Self::new(build_background(config.kind, options), options.count, config.seed);
        Ok(if config.record_positions {
            scene.with_position_log(DEFAULT_LOG_LIMIT)
        } else {
            scene
        })
    }

    /// Record every tick into a bounded [`PositionLog`]
    pub fn with_position_log(mut self, limit: usize) -> Self {
        self.log = Some(PositionLog::with_limit(limit));
        self
    }

    /// Advance the scene by `delta` seconds
    ///
    /// Negative and non-finite deltas advance nothing but still run the
    /// collection pass.
    pub fn tick<F>(&mut self, delta: f32, on_collect: F) -> TickReport
    where
        F: FnMut(&CollectionEvent) -> Result<(), CollectError>,
    {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let background = &self.background;
        let pool = &mut self.pool;
        let rng = &mut self.rng;
        let mut report = TickReport {
            tick: self.ticks,
            delta,
            ..TickReport::default()
        };

        if background.recycle_collected() {
            let collected: Vec<usize> = pool
                .as_slice()
                .iter()
                .enumerate()
                .filter_map(|(index, entity)| entity.is_collected().then_some(index))
                .collect();
            for index in collected {
                if pool.recycle(index, background.respawn(rng)).is_some() {
                    report.recycled += 1;
                }
            }
        }

        if let Some(spawner) = &self.spawner {
            report.spawned = spawner.tick(pool, rng, delta);
        }

        let bounds = *background.bounds();
        let policy = background.policy();
        let mut leaving = Vec::new();
        pool.for_each(|handle, entity| {
            if !step(entity, delta) {
                return;
            }
            match apply_bounds(entity, &bounds, policy) {
                BoundsOutcome::Inside => {}
                BoundsOutcome::Wrapped => {
                    background.on_wrapped(entity, rng);
                    report.wrapped += 1;
                }
                BoundsOutcome::Recycle => leaving.push(handle.index as usize),
            }
        });
        for index in leaving {
            if pool.recycle(index, background.respawn(rng)).is_some() {
                report.recycled += 1;
            }
        }

        self.elapsed += delta;
        let reference = self.background.reference_point(self.elapsed);
        if let (Some(check), Some(reference)) = (&self.check, reference) {
            report.collection = check.run(&reference, &mut self.pool, on_collect);
            self.score += report.collection.points();
        }

        if let Some(log) = &mut self.log {
            log.record(self.ticks, reference, &self.pool);
        }
        if report.recycled > 0 {
            log::trace!("Tick {}: recycled {} entities", self.ticks, report.recycled);
        }
        self.ticks += 1;
        report
    }

    /// The variant driving this scene
    pub fn background(&self) -> &dyn Background {
        self.background.as_ref()
    }

    /// Entity storage
    pub fn pool(&self) -> &ObjectPool<Entity> {
        &self.pool
    }

    /// Simulated seconds, after time scaling
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Points collected so far
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Collection radius, if the variant collects
    pub fn collect_threshold(&self) -> Option<f32> {
        self.check.map(|check| check.threshold())
    }

    /// Current reference point, if the variant has one
    pub fn reference_point(&self) -> Option<Vec3> {
        self.background.reference_point(self.elapsed)
    }

    /// Recorded positions, when recording is enabled
    pub fn position_log(&self) -> Option<&PositionLog> {
        self.log.as_ref()
    }

    /// Release every entity; returns how many were held
    pub fn dispose(&mut self) -> usize {
        self.pool.dispose()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("kind", &self.background.kind())
            .field("entities", &self.pool.len())
            .field("elapsed", &self.elapsed)
            .field("ticks", &self.ticks)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}
