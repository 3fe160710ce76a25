//! Driver lifecycle: acquisition, loss, liveness, teardown

use backdrop_engine::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn runner_config() -> SceneConfig {
    SceneConfig::for_kind(BackgroundKind::Runner).with_seed(12)
}

#[test]
fn surface_loss_stops_cleanly_and_for_good() {
    let surface = HeadlessSurface::new(200, 100);
    let switch = surface.loss_switch();
    let record = surface.recorder();
    let mut handle = SceneDriver::new(runner_config(), AssetCache::with_builtin().unwrap())
        .start(move |_, _| Ok(surface))
        .unwrap();

    let stopped = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&stopped);
    handle.subscribe(
        EventType::Stopped,
        Box::new(move |event: &SceneEvent| {
            if let SceneEvent::Stopped(reason) = event {
                sink.borrow_mut().push(*reason);
            }
            true
        }),
    );

    for _ in 0..10 {
        assert_eq!(handle.frame(0.016), FrameOutcome::Continue);
    }
    switch.trigger();
    assert_eq!(handle.frame(0.016), FrameOutcome::Stopped(StopReason::SurfaceLost));
    assert_eq!(handle.frame(0.016), FrameOutcome::Stopped(StopReason::SurfaceLost));
    handle.stop();

    assert_eq!(handle.state(), DriverState::Stopped(StopReason::SurfaceLost));
    assert_eq!(record.borrow().frames_drawn, 10);
    assert_eq!(record.borrow().releases, 1);
    assert_eq!(*stopped.borrow(), vec![StopReason::SurfaceLost]);
    assert!(!handle.liveness().is_live());
}

#[test]
fn stop_twice_matches_stop_once() {
    let assets = AssetCache::with_builtin().unwrap();
    let start = || {
        SceneDriver::new(runner_config(), Arc::clone(&assets))
            .start(|_, _| Ok(HeadlessSurface::new(50, 50)))
            .unwrap()
    };

    let mut once = start();
    let mut twice = start();
    for handle in [&mut once, &mut twice] {
        for _ in 0..30 {
            handle.frame(0.016);
        }
    }
    once.stop();
    twice.stop();
    twice.stop();

    assert_eq!(once.state(), twice.state());
    assert_eq!(once.stats(), twice.stats());
    assert_eq!(*once.surface().recorder().borrow(), *twice.surface().recorder().borrow());
    assert_eq!(once.scene().pool().len(), twice.scene().pool().len());
}

#[test]
fn failed_acquisition_never_starts_a_frame() {
    let attempts = RefCell::new(0);
    let result = SceneDriver::new(SceneConfig::for_kind(BackgroundKind::Meteors), AssetCache::with_builtin().unwrap())
        .start(|_, _| {
            *attempts.borrow_mut() += 1;
            Err::<HeadlessSurface, _>(SurfaceError::Unavailable("webgl disabled".into()))
        });

    assert_eq!(*attempts.borrow(), 1);
    match result {
        Err(DriverError::SurfaceUnavailable { reason, fallback }) => {
            assert!(reason.contains("webgl disabled"));
            assert_eq!(fallback, ResolvedOptions::defaults_for(BackgroundKind::Meteors).color);
        }
        other => panic!("expected SurfaceUnavailable, got {other:?}"),
    }
}

#[test]
fn invalid_config_is_rejected_before_acquisition() {
    let config = SceneConfig::for_kind(BackgroundKind::Rain).with_options(BackgroundOptions {
        speed: Some(-1.0),
        ..BackgroundOptions::default()
    });
    let result = SceneDriver::new(config, AssetCache::with_builtin().unwrap())
        .start(|_, _| -> Result<HeadlessSurface, SurfaceError> { panic!("must not acquire") });
    assert!(matches!(result, Err(DriverError::Config(_))));
}

#[test]
fn cache_teardown_only_affects_new_drivers() {
    let assets = AssetCache::with_builtin().unwrap();
    let mut running = SceneDriver::new(runner_config(), Arc::clone(&assets))
        .start(|_, _| Ok(HeadlessSurface::new(80, 24)))
        .unwrap();

    assert!(assets.teardown().unwrap() > 0);
    for _ in 0..20 {
        assert!(running.frame(0.016).should_continue());
    }
    assert!(running.holds_assets());

    let late = SceneDriver::new(runner_config(), Arc::clone(&assets)).start(|_, _| Ok(HeadlessSurface::new(80, 24)));
    assert!(matches!(late, Err(DriverError::Asset(AssetError::TornDown))));

    running.stop();
    assert!(!running.holds_assets());
}

#[test]
fn two_scenes_share_one_cache_independently() {
    let assets = AssetCache::with_builtin().unwrap();
    let mut rain = SceneDriver::new(SceneConfig::for_kind(BackgroundKind::Rain).with_seed(1), Arc::clone(&assets))
        .start(|_, _| Ok(HeadlessSurface::new(80, 24)))
        .unwrap();
    let mut waves = SceneDriver::new(SceneConfig::for_kind(BackgroundKind::Waves).with_seed(1), Arc::clone(&assets))
        .start(|_, _| Ok(HeadlessSurface::new(80, 24)))
        .unwrap();

    rain.frame(0.016);
    waves.frame(0.016);
    rain.stop();
    assert_eq!(waves.frame(0.016), FrameOutcome::Continue);
    assert_eq!(waves.stats().frames, 2);
}

#[test]
fn text_surface_shows_the_scene() {
    let assets = AssetCache::with_builtin().unwrap();
    let config = SceneConfig::for_kind(BackgroundKind::Particles).with_seed(3);
    let mut handle = SceneDriver::new(config, Arc::clone(&assets))
        .start(|config, cache| {
            let ramp = cache.ramp(AssetCache::DEFAULT_RAMP).map_err(|e| SurfaceError::Unavailable(e.to_string()))?;
            Ok(TextSurface::new(config.width, config.height, ramp))
        })
        .unwrap();

    FrameLoop::for_config(handle.config()).run_simulated(&mut handle, 30, 1.0 / 60.0);
    assert!(handle.surface().lit_cells() > 0);
    assert_eq!(handle.surface().to_text().lines().count(), 24);
}
