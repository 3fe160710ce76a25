//! Long-running scenario: 50 entities, 1000 ticks of 16 ms, bounds [0, 1000]

use backdrop_engine::prelude::*;
use backdrop_engine::update::BoundsPolicy;

const TICKS: u64 = 1000;
const DELTA: f32 = 0.016;
const COUNT: usize = 50;
const THRESHOLD: f32 = 40.0;

/// Collectibles falling past a fixed catcher near the bottom of the field
struct Catcher {
    bounds: Bounds,
}

impl Catcher {
    fn new() -> Self {
        Self {
            bounds: Bounds::planar(1000.0, 1000.0, Axis::Y),
        }
    }
}

impl Background for Catcher {
    fn kind(&self) -> BackgroundKind {
        BackgroundKind::Rain
    }

    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::Respawn
    }

    fn spawn(&self, rng: &mut SceneRng) -> Entity {
        Entity::new(EntityKind::Collectible, rng.point_in(&self.bounds))
            .with_velocity(Vec3::new(rng.signed(40.0), -rng.range(150.0, 300.0), 0.0))
            .with_value(1)
    }

    fn respawn(&self, rng: &mut SceneRng) -> Entity {
        Entity::new(EntityKind::Collectible, Vec3::new(rng.range(0.0, 1000.0), 1000.0, 0.0))
            .with_velocity(Vec3::new(rng.signed(40.0), -rng.range(150.0, 300.0), 0.0))
            .with_value(1)
    }

    fn collect_threshold(&self) -> Option<f32> {
        Some(THRESHOLD)
    }

    fn reference_point(&self, _elapsed: f32) -> Option<Vec3> {
        Some(Vec3::new(500.0, 100.0, 0.0))
    }

    fn recycle_collected(&self) -> bool {
        false
    }
}

#[test]
fn fifty_entities_thousand_ticks_stay_in_bounds_and_collections_are_logged() {
    let mut scene = Scene::new(Box::new(Catcher::new()), COUNT, Some(2024)).with_position_log(TICKS as usize);
    let bounds = *scene.background().bounds();
    let mut callbacks = 0u64;

    for _ in 0..TICKS {
        scene.tick(DELTA, |_| {
            callbacks += 1;
            Ok(())
        });
    }

    assert_eq!(scene.ticks(), TICKS);
    assert_eq!(scene.pool().len(), COUNT);
    for entity in scene.pool().as_slice() {
        assert!(bounds.contains(&entity.position), "{:?} outside [0, 1000]", entity.position);
    }

    let collected = scene.pool().as_slice().iter().filter(|e| e.is_collected()).count() as u64;
    assert!(collected > 0, "the catcher should have caught something in 16 simulated seconds");
    assert_eq!(collected, callbacks);
    assert_eq!(scene.score(), collected);

    // Re-run the distance check against what was logged
    let log = scene.position_log().unwrap();
    assert_eq!(log.len(), TICKS as usize);
    assert!(log.unexplained_collections(THRESHOLD).is_empty());

    for sample in log.samples() {
        let reference = sample.reference.unwrap();
        for entity in &sample.entities {
            if entity.state == EntityState::Collected {
                continue;
            }
            // Anything still active at the end of a tick was never in reach
            assert!((entity.position - reference).norm() >= THRESHOLD);
        }
    }
}

#[test]
fn builtin_rain_keeps_fifty_entities_in_bounds() {
    let options = BackgroundOptions {
        count: Some(COUNT),
        speed: Some(1.0),
        ..BackgroundOptions::default()
    };
    let config = SceneConfig::for_kind(BackgroundKind::Rain).with_seed(77).with_options(options);
    let mut scene = Scene::from_config(&config).unwrap();

    for _ in 0..TICKS {
        scene.tick(DELTA, |_| Ok(()));
    }

    let within = |v: f32| (0.0..=1000.0).contains(&v);
    for entity in scene.pool().as_slice() {
        assert!(within(entity.position.x) && within(entity.position.y));
        assert!(!entity.is_collected());
    }
}

#[test]
fn log_check_flags_a_tampered_collection() {
    let mut pool = ObjectPool::create(2, |i| Entity::new(EntityKind::Collectible, Vec3::new(900.0, 100.0 * i as f32, 0.0)));
    pool.for_each(|_, entity| {
        entity.mark_collected();
    });

    let mut log = backdrop_engine::scene::PositionLog::with_limit(4);
    log.record(0, Some(Vec3::new(500.0, 100.0, 0.0)), &pool);
    assert_eq!(log.unexplained_collections(THRESHOLD).len(), 2);
}
