//! Headless backdrop runner
//!
//! Runs one configured background on a character-grid surface and prints
//! the final frame. Useful for eyeballing a variant and for checking that a
//! config file parses and validates.

mod config;

use backdrop_engine::assets::AssetCache;
use backdrop_engine::foundation::logging::{self, LevelFilter};
use backdrop_engine::render::{Surface, SurfaceSize, TextSurface};
use backdrop_engine::scene::{DriverError, FrameLoop, SceneDriver};
use config::{AppConfig, Args};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(LevelFilter::Info);

    let args = Args::parse(std::env::args().skip(1))?;
    let config = args.resolve()?;
    log::info!("Starting backdrops: {} for {} frames", config.scene.kind, config.frames);

    run(&config)
}

fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let assets = AssetCache::with_builtin()?;
    let glyph_background = config.background_glyph;

    let started = SceneDriver::new(config.scene.clone(), std::sync::Arc::clone(&assets)).start(|scene, cache| {
        let ramp = cache
            .ramp(AssetCache::DEFAULT_RAMP)
            .map_err(|e| backdrop_engine::render::SurfaceError::Unavailable(e.to_string()))?;
        Ok(TextSurface::new(scene.width, scene.height, ramp).with_background(glyph_background))
    });

    let mut handle = match started {
        Ok(handle) => handle,
        Err(DriverError::SurfaceUnavailable { fallback, .. }) => {
            // The scene never started; show the static color and exit cleanly
            println!(
                "background unavailable, fallback color rgba({:.0}, {:.0}, {:.0}, {:.2})",
                fallback.r * 255.0,
                fallback.g * 255.0,
                fallback.b * 255.0,
                fallback.a
            );
            assets.teardown()?;
            return Ok(());
        }
        Err(error) => return Err(error.into()),
    };

    let frame_loop = FrameLoop::for_config(&config.scene);
    let summary = if config.realtime {
        let budget = Duration::from_secs_f32(config.frames as f32 / frame_loop.target_fps() as f32);
        frame_loop.run_realtime(&mut handle, budget)
    } else {
        frame_loop.run_simulated(&mut handle, config.frames, frame_loop.fixed_delta())
    };

    let SurfaceSize { width, height } = handle.surface().size();
    println!("{}", handle.surface().to_text());
    println!("{width}x{height} | frames {} | score {}", summary.frames, handle.stats().score);

    let stats = handle.stats();
    log::info!(
        "Finished after {} frames ({:.2}s simulated): {} spawned, {} recycled, {} collected, {} callback failures",
        stats.frames,
        stats.elapsed,
        stats.spawned,
        stats.recycled,
        stats.collected,
        stats.callback_failures
    );

    handle.stop();
    assets.teardown()?;
    Ok(())
}
