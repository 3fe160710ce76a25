//! Shared asset cache
//!
//! Palettes and glyph ramps are loaded once and shared by every scene that
//! asks for them. The cache is an explicit object with its own
//! [`AssetCache::init`] / [`AssetCache::teardown`] pair; drivers receive it
//! as an `Arc<AssetCache>` instead of reaching for module-level state.

use crate::config::Rgba;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Asset errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The cache has not been initialized yet
    #[error("asset cache is not initialized")]
    NotInitialized,

    /// The cache was torn down
    #[error("asset cache has been torn down")]
    TornDown,

    /// No asset with this name
    #[error("asset not found: {0}")]
    NotFound(String),

    /// Lock poisoned by a panicking writer
    #[error("asset cache lock poisoned")]
    Poisoned,

    /// Asset data is unusable
    #[error("invalid asset `{name}`: {reason}")]
    Invalid {
        /// Asset name
        name: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Ordered set of colors
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette; at least one color is required
    pub fn new(name: &str, colors: Vec<Rgba>) -> Result<Self, AssetError> {
        if colors.is_empty() {
            return Err(AssetError::Invalid {
                name: name.to_string(),
                reason: "palette has no colors".to_string(),
            });
        }
        Ok(Self { colors })
    }

    /// Shades of a base color, brightest last
    pub fn shades_of(base: Rgba, steps: usize) -> Self {
        let steps = steps.max(1);
        let colors = (1..=steps)
            .map(|i| {
                let t = i as f32 / steps as f32;
                Rgba::new(base.r * t, base.g * t, base.b * t, base.a)
            })
            .collect();
        Self { colors }
    }

    /// Color for a normalized intensity in `[0, 1]`
    pub fn sample(&self, intensity: f32) -> Rgba {
        let last = self.colors.len() - 1;
        let index = (intensity.clamp(0.0, 1.0) * last as f32).round() as usize;
        self.colors[index.min(last)]
    }

    /// Number of colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false: palettes are never empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Characters ordered from faint to bright, used by text surfaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Default ramp
    pub const DEFAULT: &'static str = ".:-=+*#%@";

    /// Build a ramp from a string of glyphs
    pub fn new(name: &str, glyphs: &str) -> Result<Self, AssetError> {
        let glyphs: Vec<char> = glyphs.chars().filter(|c| !c.is_whitespace()).collect();
        if glyphs.is_empty() {
            return Err(AssetError::Invalid {
                name: name.to_string(),
                reason: "glyph ramp is empty".to_string(),
            });
        }
        Ok(Self { glyphs })
    }

    /// Glyph for a normalized intensity in `[0, 1]`
    pub fn glyph_for(&self, intensity: f32) -> char {
        let last = self.glyphs.len() - 1;
        let index = (intensity.clamp(0.0, 1.0) * last as f32).round() as usize;
        self.glyphs[index.min(last)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheState {
    Uninitialized,
    Live,
    TornDown,
}

#[derive(Debug)]
struct CacheInner {
    state: CacheState,
    palettes: HashMap<String, Arc<Palette>>,
    ramps: HashMap<String, Arc<GlyphRamp>>,
}

/// Process-wide asset cache with explicit lifetime
#[derive(Debug)]
pub struct AssetCache {
    inner: RwLock<CacheInner>,
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetCache {
    /// Name of the built-in glyph ramp
    pub const DEFAULT_RAMP: &'static str = "default";

    /// Create an uninitialized cache
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                state: CacheState::Uninitialized,
                palettes: HashMap::new(),
                ramps: HashMap::new(),
            }),
        }
    }

    /// Create and initialize a cache in one step
    pub fn with_builtin() -> Result<Arc<Self>, AssetError> {
        let cache = Self::new();
        cache.init()?;
        Ok(Arc::new(cache))
    }

    /// Initialize the cache and register built-in assets
    ///
    /// Calling `init` on a live cache is a no-op; a torn-down cache cannot
    /// be revived.
    pub fn init(&self) -> Result<(), AssetError> {
        let mut inner = self.inner.write().map_err(|_| AssetError::Poisoned)?;
        match inner.state {
            CacheState::Live => return Ok(()),
            CacheState::TornDown => return Err(AssetError::TornDown),
            CacheState::Uninitialized => {}
        }

        let ramp = GlyphRamp::new(Self::DEFAULT_RAMP, GlyphRamp::DEFAULT)?;
        inner.ramps.insert(Self::DEFAULT_RAMP.to_string(), Arc::new(ramp));
        inner.state = CacheState::Live;
        log::info!("Asset cache initialized");
        Ok(())
    }

    /// Release every cached asset
    ///
    /// Outstanding `Arc`s stay valid for their holders; new lookups fail with
    /// [`AssetError::TornDown`]. Returns the number of assets released.
    pub fn teardown(&self) -> Result<usize, AssetError> {
        let mut inner = self.inner.write().map_err(|_| AssetError::Poisoned)?;
        if inner.state == CacheState::TornDown {
            return Ok(0);
        }
        let released = inner.palettes.len() + inner.ramps.len();
        inner.palettes.clear();
        inner.ramps.clear();
        inner.state = CacheState::TornDown;
        log::info!("Asset cache torn down ({} assets released)", released);
        Ok(released)
    }

    /// Whether the cache accepts lookups
    pub fn is_live(&self) -> bool {
        self.inner.read().map(|inner| inner.state == CacheState::Live).unwrap_or(false)
    }

    fn check_live(state: CacheState) -> Result<(), AssetError> {
        match state {
            CacheState::Live => Ok(()),
            CacheState::Uninitialized => Err(AssetError::NotInitialized),
            CacheState::TornDown => Err(AssetError::TornDown),
        }
    }

    /// Register a palette under `name`, replacing any previous one
    pub fn insert_palette(&self, name: &str, palette: Palette) -> Result<Arc<Palette>, AssetError> {
        let mut inner = self.inner.write().map_err(|_| AssetError::Poisoned)?;
        Self::check_live(inner.state)?;
        let palette = Arc::new(palette);
        inner.palettes.insert(name.to_string(), Arc::clone(&palette));
        Ok(palette)
    }

    /// Look up a palette
    pub fn palette(&self, name: &str) -> Result<Arc<Palette>, AssetError> {
        let inner = self.inner.read().map_err(|_| AssetError::Poisoned)?;
        Self::check_live(inner.state)?;
        inner
            .palettes
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Get a palette, building and caching it on first use
    pub fn palette_or_insert_with(
        &self,
        name: &str,
        build: impl FnOnce() -> Palette,
    ) -> Result<Arc<Palette>, AssetError> {
        match self.palette(name) {
            Ok(palette) => Ok(palette),
            Err(AssetError::NotFound(_)) => {
                let mut inner = self.inner.write().map_err(|_| AssetError::Poisoned)?;
                Self::check_live(inner.state)?;
                // Another holder may have inserted between the two locks
                let palette = inner
                    .palettes
                    .entry(name.to_string())
                    .or_insert_with(|| Arc::new(build()));
                Ok(Arc::clone(palette))
            }
            Err(error) => Err(error),
        }
    }

    /// Register a glyph ramp under `name`
    pub fn insert_ramp(&self, name: &str, ramp: GlyphRamp) -> Result<Arc<GlyphRamp>, AssetError> {
        let mut inner = self.inner.write().map_err(|_| AssetError::Poisoned)?;
        Self::check_live(inner.state)?;
        let ramp = Arc::new(ramp);
        inner.ramps.insert(name.to_string(), Arc::clone(&ramp));
        Ok(ramp)
    }

    /// Look up a glyph ramp
    pub fn ramp(&self, name: &str) -> Result<Arc<GlyphRamp>, AssetError> {
        let inner = self.inner.read().map_err(|_| AssetError::Poisoned)?;
        Self::check_live(inner.state)?;
        inner
            .ramps
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Number of cached assets
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.palettes.len() + inner.ramps.len())
            .unwrap_or(0)
    }

    /// Whether the cache holds no assets
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
