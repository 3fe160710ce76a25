//! Scene loop driver
//!
//! Lifecycle:
//! - [`SceneDriver::new`] validates nothing and holds the configuration (`Idle`)
//! - [`SceneDriver::start`] acquires the surface and returns a running [`SceneHandle`]
//! - [`SceneHandle::frame`] advances one frame per host callback (`Running`)
//! - [`SceneHandle::stop`] or drop releases everything once (`Stopped`)

use super::recorder::PositionLog;
use super::simulation::Scene;
use super::state::{DriverState, LivenessToken, StopReason};
use crate::assets::{AssetCache, AssetError, Palette};
use crate::collision::{isolate, CollectError, CollectionEvent};
use crate::config::{ConfigError, Rgba, SceneConfig, MAX_SURFACE_DIMENSION};
use crate::events::{EventHandler, EventSystem, EventType, SceneEvent};
use crate::foundation::time::FrameClock;
use crate::render::{FrameView, Surface, SurfaceError, SurfaceSize};
use std::sync::Arc;
use thiserror::Error;

/// Palette steps generated for each variant color
const PALETTE_STEPS: usize = 8;

/// Errors that keep a scene from starting
#[derive(Error, Debug)]
pub enum DriverError {
    /// The scene configuration is invalid
    #[error("invalid scene configuration: {0}")]
    Config(#[from] ConfigError),

    /// Shared assets could not be obtained
    #[error("asset cache error: {0}")]
    Asset(#[from] AssetError),

    /// No drawable surface; the host should show `fallback` instead
    #[error("rendering surface unavailable: {reason}")]
    SurfaceUnavailable {
        /// What the surface reported
        reason: String,
        /// Static background color to show instead of the animation
        fallback: Rgba,
    },
}

impl DriverError {
    /// Static color to show in place of the scene, when one applies
    pub fn fallback_color(&self) -> Option<Rgba> {
        match self {
            Self::SurfaceUnavailable { fallback, .. } => Some(*fallback),
            _ => None,
        }
    }
}

/// Result of one frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule another frame
    Continue,
    /// The driver has stopped; do not schedule again
    Stopped(StopReason),
}

impl FrameOutcome {
    /// Whether the host should schedule another frame
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frames advanced
    pub frames: u64,
    /// Frames the surface accepted
    pub frames_drawn: u64,
    /// Simulated seconds, after time scaling
    pub elapsed: f32,
    /// Dormant slots the spawner activated
    pub spawned: u64,
    /// Entities replaced by fresh spawns
    pub recycled: u64,
    /// Entities collected
    pub collected: u64,
    /// Points collected
    pub score: u64,
    /// Collection or score callbacks that failed or panicked
    pub callback_failures: u64,
    /// Draw calls that failed without losing the surface
    pub draw_failures: u64,
}

type CollectCallback = Box<dyn FnMut(&CollectionEvent) -> Result<(), CollectError>>;
type ScoreCallback = Box<dyn FnMut(u64)>;

/// Idle driver holding a configuration and the shared asset cache
#[derive(Debug)]
pub struct SceneDriver {
    config: SceneConfig,
    assets: Arc<AssetCache>,
}

impl SceneDriver {
    /// Create an idle driver
    pub fn new(config: SceneConfig, assets: Arc<AssetCache>) -> Self {
        Self { config, assets }
    }

    /// Always [`DriverState::Idle`]; a started driver becomes a [`SceneHandle`]
    pub fn state(&self) -> DriverState {
        DriverState::Idle
    }

    /// Configuration the scene will start with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Acquire a surface and start the scene
    ///
    /// `acquire` is called once. If it fails, or returns a surface that is
    /// already unavailable, the failure is logged once and reported as
    /// [`DriverError::SurfaceUnavailable`] carrying the fallback color; no
    /// frame is ever scheduled.
    pub fn start<S, A>(self, acquire: A) -> Result<SceneHandle<S>, DriverError>
    where
        S: Surface,
        A: FnOnce(&SceneConfig, &AssetCache) -> Result<S, SurfaceError>,
    {
        let config = self.config;
        config.validate()?;
        let options = config.resolved_options()?;

        let palette = self
            .assets
            .palette_or_insert_with(&palette_key(&config, options.color), || {
                Palette::shades_of(options.color, PALETTE_STEPS)
            })?;
        let scene = Scene::from_config(&config)?;

        let surface = match acquire(&config, &self.assets) {
            Ok(surface) if surface.is_available() => surface,
            Ok(mut surface) => {
                surface.release();
                return Err(Self::unavailable(&config, "surface reported unavailable".to_string()));
            }
            Err(error) => return Err(Self::unavailable(&config, error.to_string())),
        };

        log::info!(
            "Scene {} running: {} entities on a {}x{} surface",
            config.kind,
            scene.pool().len(),
            surface.size().width,
            surface.size().height
        );

        let mut events = EventSystem::new();
        events.send(SceneEvent::Started { kind: config.kind });

        Ok(SceneHandle {
            clock: FrameClock::new(config.max_delta),
            speed: options.speed,
            color: options.color,
            glow: options.glow_intensity,
            config,
            scene,
            surface,
            assets: Some(self.assets),
            palette: Some(palette),
            state: DriverState::Running,
            liveness: LivenessToken::new(),
            events,
            collect_callbacks: Vec::new(),
            score_callbacks: Vec::new(),
            stats: FrameStats::default(),
        })
    }

    fn unavailable(config: &SceneConfig, reason: String) -> DriverError {
        let fallback = config.fallback_color();
        log::error!("Scene {} cannot start, showing static background: {}", config.kind, reason);
        DriverError::SurfaceUnavailable { reason, fallback }
    }
}

/// A running scene bound to its surface
///
/// Dropping the handle stops the scene.
pub struct SceneHandle<S: Surface> {
    config: SceneConfig,
    speed: f32,
    color: Rgba,
    glow: f32,
    scene: Scene,
    surface: S,
    assets: Option<Arc<AssetCache>>,
    palette: Option<Arc<Palette>>,
    clock: FrameClock,
    state: DriverState,
    liveness: LivenessToken,
    events: EventSystem,
    collect_callbacks: Vec<CollectCallback>,
    score_callbacks: Vec<ScoreCallback>,
    stats: FrameStats,
}

impl<S: Surface> SceneHandle<S> {
    /// Advance the scene by one host frame of `delta` seconds
    ///
    /// The delta is clamped to the configured maximum and then scaled by
    /// the variant speed. A revoked liveness token or an unavailable surface
    /// stops the driver instead of advancing.
    pub fn frame(&mut self, delta: f32) -> FrameOutcome {
        if let DriverState::Stopped(reason) = self.state {
            return FrameOutcome::Stopped(reason);
        }
        if !self.liveness.is_live() {
            return self.stop_with(StopReason::Cancelled);
        }
        if !self.surface.is_available() {
            log::warn!("Surface for scene {} became unavailable", self.config.kind);
            return self.stop_with(StopReason::SurfaceLost);
        }

        let delta = self.clock.advance(delta) * self.speed;
        let callbacks = &mut self.collect_callbacks;
        let mut further_failures = 0;
        let report = self
            .scene
            .tick(delta, |event| run_collect_callbacks(callbacks, event, &mut further_failures));

        self.stats.frames += 1;
        self.stats.elapsed = self.scene.elapsed();
        self.stats.spawned += u64::from(report.spawned.is_some());
        self.stats.recycled += report.recycled as u64;
        self.stats.collected += report.collection.collected() as u64;
        self.stats.callback_failures += report.collection.failures.len() as u64 + further_failures;

        for event in &report.collection.events {
            self.events.send(SceneEvent::Collected(*event));
        }
        if report.collection.points() > 0 {
            let score = self.scene.score();
            self.stats.score = score;
            self.events.send(SceneEvent::ScoreChanged { score });
            for callback in &mut self.score_callbacks {
                if let Err(error) = isolate(|| {
                    callback(score);
                    Ok(())
                }) {
                    log::warn!("Isolated score callback failure: {}", error);
                    self.stats.callback_failures += 1;
                }
            }
        }

        if let Some(outcome) = self.draw() {
            return outcome;
        }
        self.stats.callback_failures += self.events.dispatch() as u64;
        FrameOutcome::Continue
    }

    fn draw(&mut self) -> Option<FrameOutcome> {
        let palette = self.palette.as_deref()?;
        let view = FrameView {
            entities: self.scene.pool().as_slice(),
            bounds: self.scene.background().bounds(),
            color: self.color,
            palette,
            glow: self.glow,
            elapsed: self.scene.elapsed(),
            score: self.scene.score(),
            frame: self.stats.frames - 1,
        };
        match self.surface.draw(&view) {
            Ok(()) => {
                self.stats.frames_drawn += 1;
                None
            }
            Err(SurfaceError::Lost) => {
                log::warn!("Surface for scene {} lost during draw", self.config.kind);
                Some(self.stop_with(StopReason::SurfaceLost))
            }
            Err(error) => {
                log::warn!("Frame {} not drawn: {}", self.stats.frames, error);
                self.stats.draw_failures += 1;
                None
            }
        }
    }

    /// Stop the scene and release its resources
    ///
    /// Idempotent: only the first call (or the first automatic stop) does
    /// any work.
    pub fn stop(&mut self) {
        self.stop_with(StopReason::Requested);
    }

    fn stop_with(&mut self, reason: StopReason) -> FrameOutcome {
        if let DriverState::Stopped(previous) = self.state {
            return FrameOutcome::Stopped(previous);
        }
        self.state = DriverState::Stopped(reason);
        self.liveness.revoke();
        self.surface.release();
        let released = self.scene.dispose();
        self.palette = None;
        self.assets = None;
        self.collect_callbacks.clear();
        self.score_callbacks.clear();

        self.events.send(SceneEvent::Stopped(reason));
        self.stats.callback_failures += self.events.dispatch() as u64;
        self.events.clear();

        log::info!(
            "Scene {} stopped ({}) after {} frames, {} entities released",
            self.config.kind,
            reason,
            self.stats.frames,
            released
        );
        FrameOutcome::Stopped(reason)
    }

    /// Adopt a new surface size
    ///
    /// Setting the current size again does nothing. Each dimension is capped
    /// at [`MAX_SURFACE_DIMENSION`].
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.min(MAX_SURFACE_DIMENSION), height.min(MAX_SURFACE_DIMENSION));
        let size = SurfaceSize::new(width, height);
        if self.state.is_stopped() || self.surface.size() == size {
            return;
        }
        log::debug!("Scene {} resized to {}x{}", self.config.kind, width, height);
        self.surface.resize(size);
        self.events.send(SceneEvent::Resized { width, height });
    }

    /// Token the host checks before scheduling the next frame
    pub fn liveness(&self) -> LivenessToken {
        self.liveness.clone()
    }

    /// Call `callback` once for every collected entity
    ///
    /// Failures and panics are logged and counted; other callbacks and the
    /// frame itself carry on.
    pub fn on_collect<F>(&mut self, callback: F)
    where
        F: FnMut(&CollectionEvent) -> Result<(), CollectError> + 'static,
    {
        self.collect_callbacks.push(Box::new(callback));
    }

    /// Call `callback` with the new total whenever the score changes
    pub fn on_score_change<F>(&mut self, callback: F)
    where
        F: FnMut(u64) + 'static,
    {
        self.score_callbacks.push(Box::new(callback));
    }

    /// Register a handler for scene events
    pub fn subscribe(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.events.register_handler(event_type, handler);
    }

    /// Current state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Running counters
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Configuration the scene was started with
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The underlying simulation
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Positions recorded so far, when recording is enabled
    pub fn position_log(&self) -> Option<&PositionLog> {
        self.scene.position_log()
    }

    /// The surface being drawn to
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether the handle still holds the asset cache
    pub fn holds_assets(&self) -> bool {
        self.assets.is_some() && self.palette.is_some()
    }
}

impl<S: Surface> Drop for SceneHandle<S> {
    fn drop(&mut self) {
        self.stop_with(StopReason::Dropped);
    }
}

impl<S: Surface> std::fmt::Debug for SceneHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneHandle")
            .field("state", &self.state)
            .field("scene", &self.scene)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Cache key of the palette generated for a variant color
fn palette_key(config: &SceneConfig, color: Rgba) -> String {
    format!("{}/{:.3}/{:.3}/{:.3}", config.kind.name(), color.r, color.g, color.b)
}

/// Run every collection callback for one event
///
/// Each callback is isolated on its own so a failing one does not starve
/// the rest. The first failure is returned to the collection check, which
/// records it; every later one is logged here and added to `further`.
fn run_collect_callbacks(
    callbacks: &mut [CollectCallback],
    event: &CollectionEvent,
    further: &mut u64,
) -> Result<(), CollectError> {
    let mut first_failure = None;
    for callback in callbacks.iter_mut() {
        if let Err(error) = isolate(|| callback(event)) {
            if first_failure.is_none() {
                first_failure = Some(error);
            } else {
                log::warn!("Isolated collection callback failure for {:?}: {}", event.handle, error);
                *further += 1;
            }
        }
    }
    first_failure.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backgrounds::BackgroundKind;
    use crate::render::HeadlessSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn assets() -> Arc<AssetCache> {
        AssetCache::with_builtin().unwrap()
    }

    fn start(kind: BackgroundKind) -> SceneHandle<HeadlessSurface> {
        SceneDriver::new(SceneConfig::for_kind(kind).with_seed(5), assets())
            .start(|_, _| Ok(HeadlessSurface::new(320, 200)))
            .unwrap()
    }

    #[test]
    fn test_start_and_frame() {
        let mut handle = start(BackgroundKind::Particles);
        assert_eq!(handle.state(), DriverState::Running);
        assert_eq!(handle.frame(0.016), FrameOutcome::Continue);
        assert_eq!(handle.stats().frames, 1);
        assert_eq!(handle.stats().frames_drawn, 1);
    }

    #[test]
    fn test_acquisition_failure_reports_fallback() {
        let config = SceneConfig::for_kind(BackgroundKind::Rain);
        let expected = config.fallback_color();
        let result = SceneDriver::new(config, assets())
            .start(|_, _| Err::<HeadlessSurface, _>(SurfaceError::Unavailable("no context".into())));

        let error = result.unwrap_err();
        assert!(matches!(error, DriverError::SurfaceUnavailable { .. }));
        assert_eq!(error.fallback_color(), Some(expected));
    }

    #[test]
    fn test_unavailable_surface_is_rejected() {
        let result = SceneDriver::new(SceneConfig::default(), assets()).start(|_, _| Ok(HeadlessSurface::new(0, 0)));
        assert!(matches!(result, Err(DriverError::SurfaceUnavailable { .. })));
    }

    #[test]
    fn test_torn_down_assets_fail_start() {
        let cache = assets();
        cache.teardown().unwrap();
        let result = SceneDriver::new(SceneConfig::default(), cache).start(|_, _| Ok(HeadlessSurface::new(10, 10)));
        assert!(matches!(result, Err(DriverError::Asset(AssetError::TornDown))));
    }

    #[test]
    fn test_revoked_liveness_stops_at_next_frame() {
        let mut handle = start(BackgroundKind::Waves);
        let token = handle.liveness();
        handle.frame(0.016);
        token.revoke();
        assert_eq!(handle.frame(0.016), FrameOutcome::Stopped(StopReason::Cancelled));
        assert_eq!(handle.stats().frames, 1);
    }

    #[test]
    fn test_stop_releases_once() {
        let mut handle = start(BackgroundKind::Clouds);
        let record = handle.surface().recorder();
        handle.stop();
        handle.stop();
        assert_eq!(handle.state(), DriverState::Stopped(StopReason::Requested));
        assert_eq!(record.borrow().releases, 1);
        assert!(handle.scene().pool().is_empty());
        assert!(!handle.holds_assets());
        drop(handle);
        assert_eq!(record.borrow().releases, 1);
    }

    #[test]
    fn test_drop_stops_running_scene() {
        let handle = start(BackgroundKind::Heartbeat);
        let record = handle.surface().recorder();
        let token = handle.liveness();
        drop(handle);
        assert!(!token.is_live());
        assert_eq!(record.borrow().releases, 1);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut handle = start(BackgroundKind::Particles);
        let record = handle.surface().recorder();
        let resized = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&resized);
        handle.subscribe(
            EventType::Resized,
            Box::new(move |_: &SceneEvent| {
                *seen.borrow_mut() += 1;
                false
            }),
        );

        handle.resize(640, 480);
        handle.resize(640, 480);
        handle.frame(0.016);
        assert_eq!(record.borrow().resizes, 1);
        assert_eq!(*resized.borrow(), 1);
        assert_eq!(handle.surface().size(), SurfaceSize::new(640, 480));
    }

    #[test]
    fn test_draw_loss_stops_without_error() {
        let mut handle = SceneDriver::new(SceneConfig::default(), assets())
            .start(|_, _| Ok(HeadlessSurface::new(10, 10).failing_draws()))
            .unwrap();
        assert_eq!(handle.frame(0.016), FrameOutcome::Stopped(StopReason::SurfaceLost));
        assert_eq!(handle.frame(0.016), FrameOutcome::Stopped(StopReason::SurfaceLost));
    }

    #[test]
    fn test_failing_callbacks_are_isolated() {
        let mut handle = start(BackgroundKind::Runner);
        let delivered = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&delivered);
        handle.on_collect(|_| Err(CollectError::Callback("rejected".into())));
        handle.on_collect(|_| panic!("callback bug"));
        handle.on_collect(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        for _ in 0..2000 {
            assert!(handle.frame(0.016).should_continue());
        }
        let stats = handle.stats();
        assert!(stats.collected > 0);
        assert_eq!(u64::from(*delivered.borrow()), stats.collected);
        // Two of the three callbacks fail on every collection
        assert_eq!(stats.callback_failures, 2 * stats.collected);
    }

    #[test]
    fn test_every_failing_callback_is_counted() {
        let mut handle = start(BackgroundKind::Runner);
        handle.on_collect(|_| Err(CollectError::Callback("first".into())));
        handle.on_collect(|_| Err(CollectError::Callback("second".into())));

        for _ in 0..2000 {
            handle.frame(0.016);
        }
        let stats = handle.stats();
        assert!(stats.collected > 0);
        assert_eq!(stats.callback_failures, 2 * stats.collected);
    }

    #[test]
    fn test_resize_is_capped() {
        let mut handle = start(BackgroundKind::Particles);
        handle.resize(100_000, 50);
        assert_eq!(handle.surface().size(), SurfaceSize::new(MAX_SURFACE_DIMENSION, 50));
    }

    #[test]
    fn test_panicking_subscriber_does_not_escape_frame() {
        let mut handle = start(BackgroundKind::Runner);
        handle.subscribe(
            EventType::Collected,
            Box::new(|_: &SceneEvent| -> bool { panic!("subscriber bug") }),
        );
        let scores = Rc::new(RefCell::new(0u32));
        let seen = Rc::clone(&scores);
        handle.subscribe(
            EventType::ScoreChanged,
            Box::new(move |_: &SceneEvent| {
                *seen.borrow_mut() += 1;
                false
            }),
        );

        for _ in 0..2000 {
            assert_eq!(handle.frame(0.016), FrameOutcome::Continue);
        }
        let stats = handle.stats();
        assert!(stats.collected > 0);
        assert_eq!(stats.callback_failures, stats.collected);
        assert!(*scores.borrow() > 0);
    }

    #[test]
    fn test_score_callback_sees_running_total() {
        let mut handle = start(BackgroundKind::Runner);
        let last = Rc::new(RefCell::new(0u64));
        let sink = Rc::clone(&last);
        handle.on_score_change(move |score| *sink.borrow_mut() = score);
        for _ in 0..1500 {
            handle.frame(0.016);
        }
        assert_eq!(*last.borrow(), handle.stats().score);
        assert_eq!(handle.stats().score, handle.scene().score());
    }
}
