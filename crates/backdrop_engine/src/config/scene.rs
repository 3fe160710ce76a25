//! Scene and per-variant option structures

use super::{Config, ConfigError, Rgba};
use crate::backgrounds::BackgroundKind;
use serde::{Deserialize, Serialize};

/// Largest accepted pool size
pub const MAX_POOL_SIZE: usize = 4096;

/// Largest accepted surface width or height
pub const MAX_SURFACE_DIMENSION: u32 = 8192;

/// # Scene Configuration
///
/// Everything a driver needs to build one background instance: which
/// variant, its tuning options, the frame pacing and an optional seed for
/// reproducible spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Background variant
    pub kind: BackgroundKind,
    /// Variant tuning options
    pub options: BackgroundOptions,
    /// Seed for spawn randomness (entropy when absent)
    pub seed: Option<u64>,
    /// Display refresh rate the host schedules frames at
    pub target_fps: u32,
    /// Largest delta (seconds) a single frame may advance
    pub max_delta: f32,
    /// Requested surface width in pixels / cells
    pub width: u32,
    /// Requested surface height in pixels / cells
    pub height: u32,
    /// Keep a per-tick position log for offline verification
    pub record_positions: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Particles,
            options: BackgroundOptions::default(),
            seed: None,
            target_fps: 60,
            max_delta: 0.1,
            width: 80,
            height: 24,
            record_positions: false,
        }
    }
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Configuration for a variant with default options
    pub fn for_kind(kind: BackgroundKind) -> Self {
        Self { kind, ..Self::default() }
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the options
    pub fn with_options(mut self, options: BackgroundOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 || self.target_fps > 1000 {
            return Err(ConfigError::Invalid {
                field: "target_fps",
                reason: format!("{} is outside 1..=1000", self.target_fps),
            });
        }
        if !self.max_delta.is_finite() || self.max_delta <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_delta",
                reason: format!("{} must be a positive number of seconds", self.max_delta),
            });
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_SURFACE_DIMENSION {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} is outside 1..={}", value, MAX_SURFACE_DIMENSION),
                });
            }
        }
        self.options.resolve(self.kind).map(|_| ())
    }

    /// Resolved options for this scene's variant
    pub fn resolved_options(&self) -> Result<ResolvedOptions, ConfigError> {
        self.options.resolve(self.kind)
    }

    /// Static color shown when the scene cannot run
    ///
    /// Falls back to the variant's default color when the configured one
    /// does not parse.
    pub fn fallback_color(&self) -> Rgba {
        self.resolved_options()
            .map(|options| options.color)
            .unwrap_or_else(|_| ResolvedOptions::defaults_for(self.kind).color)
    }
}

/// Named options recognized by every background variant
///
/// Each field is optional; absent fields take the variant's documented
/// default (see [`ResolvedOptions::defaults_for`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOptions {
    /// Stroke / fill color as a hex string
    pub color: Option<String>,
    /// Time-scale multiplier
    pub speed: Option<f32>,
    /// Pool size
    pub count: Option<usize>,
    /// Variant-specific density (particle spread, wave amplitude, ...)
    pub density: Option<f32>,
    /// Entity size in pixels / world units
    pub pixel_size: Option<f32>,
    /// Glow strength in `[0, 1]`
    pub glow_intensity: Option<f32>,
}

impl BackgroundOptions {
    /// Fill in absent options from the variant defaults and validate
    pub fn resolve(&self, kind: BackgroundKind) -> Result<ResolvedOptions, ConfigError> {
        let defaults = ResolvedOptions::defaults_for(kind);

        let color = match &self.color {
            Some(text) => Rgba::parse_hex(text)?,
            None => defaults.color,
        };
        let resolved = ResolvedOptions {
            color,
            speed: self.speed.unwrap_or(defaults.speed),
            count: self.count.unwrap_or(defaults.count),
            density: self.density.unwrap_or(defaults.density),
            pixel_size: self.pixel_size.unwrap_or(defaults.pixel_size),
            glow_intensity: self.glow_intensity.unwrap_or(defaults.glow_intensity),
        };
        resolved.validate()?;
        Ok(resolved)
    }
}

/// Options with every default applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOptions {
    /// Entity color
    pub color: Rgba,
    /// Time-scale multiplier
    pub speed: f32,
    /// Pool size
    pub count: usize,
    /// Variant-specific density
    pub density: f32,
    /// Entity size
    pub pixel_size: f32,
    /// Glow strength
    pub glow_intensity: f32,
}

impl ResolvedOptions {
    /// Documented defaults per variant
    pub fn defaults_for(kind: BackgroundKind) -> Self {
        let (rgb, speed, count, density, pixel_size, glow) = match kind {
            BackgroundKind::Particles => ((1.0, 1.0, 1.0), 1.0, 80, 1.0, 2.0, 0.5),
            BackgroundKind::Rain => ((0.49, 0.83, 0.99), 1.0, 120, 1.0, 3.0, 0.3),
            BackgroundKind::Meteors => ((0.98, 0.75, 0.14), 1.0, 40, 1.0, 4.0, 0.8),
            BackgroundKind::Clouds => ((0.9, 0.91, 0.92), 0.5, 12, 1.0, 24.0, 0.1),
            BackgroundKind::Waves => ((0.22, 0.74, 0.97), 1.0, 5, 1.0, 2.0, 0.4),
            BackgroundKind::Heartbeat => ((0.94, 0.27, 0.27), 1.0, 64, 1.0, 2.0, 0.6),
            BackgroundKind::Runner => ((0.13, 0.77, 0.37), 1.0, 30, 1.0, 1.0, 0.5),
            BackgroundKind::CyberWorld => ((0.66, 0.33, 0.97), 1.0, 60, 1.0, 1.5, 0.7),
        };
        Self {
            color: Rgba::new(rgb.0, rgb.1, rgb.2, 1.0),
            speed,
            count,
            density,
            pixel_size,
            glow_intensity: glow,
        }
    }

    /// Validate ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "speed",
                reason: format!("{} must be a non-negative number", self.speed),
            });
        }
        if self.count == 0 || self.count > MAX_POOL_SIZE {
            return Err(ConfigError::Invalid {
                field: "count",
                reason: format!("{} is outside 1..={MAX_POOL_SIZE}", self.count),
            });
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "density",
                reason: format!("{} must be positive", self.density),
            });
        }
        if !self.pixel_size.is_finite() || self.pixel_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "pixel_size",
                reason: format!("{} must be positive", self.pixel_size),
            });
        }
        if !(0.0..=1.0).contains(&self.glow_intensity) {
            return Err(ConfigError::Invalid {
                field: "glow_intensity",
                reason: format!("{} is outside 0..=1", self.glow_intensity),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_dimensions_are_bounded() {
        let huge = SceneConfig { width: 100_000, ..SceneConfig::default() };
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid { field: "width", .. })));

        let flat = SceneConfig { height: 0, ..SceneConfig::default() };
        assert!(matches!(flat.validate(), Err(ConfigError::Invalid { field: "height", .. })));

        let largest = SceneConfig {
            width: MAX_SURFACE_DIMENSION,
            height: MAX_SURFACE_DIMENSION,
            ..SceneConfig::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_absent_options_use_variant_defaults() {
        let resolved = BackgroundOptions::default().resolve(BackgroundKind::Rain).unwrap();
        assert_eq!(resolved, ResolvedOptions::defaults_for(BackgroundKind::Rain));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = SceneConfig::from_toml_str(
            r##"
            kind = "meteors"
            seed = 42
            unknown_key = "ignored"

            [options]
            color = "#ff0000"
            count = 10
            "##,
        )
        .unwrap();

        assert_eq!(config.kind, BackgroundKind::Meteors);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.target_fps, 60);

        let resolved = config.resolved_options().unwrap();
        assert_eq!(resolved.count, 10);
        assert_eq!(resolved.color, Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(resolved.speed, ResolvedOptions::defaults_for(BackgroundKind::Meteors).speed);
    }

    #[test]
    fn test_ron_config() {
        let config = SceneConfig::from_ron_str(
            r#"(kind: runner, options: (speed: Some(2.0)), target_fps: 30)"#,
        )
        .unwrap();
        assert_eq!(config.kind, BackgroundKind::Runner);
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.resolved_options().unwrap().speed, 2.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = SceneConfig::default();
        config.options.count = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "count", .. })));

        let mut config = SceneConfig::default();
        config.options.speed = Some(f32::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "speed", .. })));

        let mut config = SceneConfig::default();
        config.target_fps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fallback_color_survives_bad_color() {
        let mut config = SceneConfig::for_kind(BackgroundKind::Clouds);
        config.options.color = Some("not a color".to_string());
        assert_eq!(config.fallback_color(), ResolvedOptions::defaults_for(BackgroundKind::Clouds).color);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = SceneConfig::load_from_file("scene.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
