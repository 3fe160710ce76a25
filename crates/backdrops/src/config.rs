//! Runner configuration
//!
//! A config file may either be a bare scene configuration or an
//! application configuration with a `[scene]` table. Command-line flags
//! override whatever the file says.

use backdrop_engine::config::{Config, ConfigError, SceneConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frames to simulate
    pub frames: u64,
    /// Pace frames against the wall clock instead of simulating them
    pub realtime: bool,
    /// Character drawn in empty cells
    pub background_glyph: char,
    /// Scene to run
    pub scene: SceneConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            realtime: false,
            background_glyph: ' ',
            scene: SceneConfig::default(),
        }
    }
}

impl Config for AppConfig {}

/// Parsed command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    /// Config file, if given
    pub config: Option<PathBuf>,
    /// `--frames N`
    pub frames: Option<u64>,
    /// `--realtime`
    pub realtime: bool,
}

/// Command-line and configuration errors
#[derive(Error, Debug)]
pub enum ArgsError {
    /// Unknown flag or missing value
    #[error("{0}\nusage: backdrops [CONFIG.toml|CONFIG.ron] [--frames N] [--realtime]")]
    Usage(String),

    /// Config file could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Args {
    /// Parse arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| ArgsError::Usage("--frames needs a value".to_string()))?;
                    let frames = value
                        .parse()
                        .map_err(|_| ArgsError::Usage(format!("invalid frame count '{value}'")))?;
                    parsed.frames = Some(frames);
                }
                "--realtime" => parsed.realtime = true,
                flag if flag.starts_with("--") => {
                    return Err(ArgsError::Usage(format!("unknown flag '{flag}'")));
                }
                path if parsed.config.is_none() => parsed.config = Some(PathBuf::from(path)),
                extra => return Err(ArgsError::Usage(format!("unexpected argument '{extra}'"))),
            }
        }
        Ok(parsed)
    }

    /// Load the config file (or defaults) and apply flag overrides
    pub fn resolve(&self) -> Result<AppConfig, ArgsError> {
        let mut config = match &self.config {
            Some(path) => load(path)?,
            None => AppConfig::default(),
        };
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        config.realtime |= self.realtime;
        Ok(config)
    }
}

/// Load an application config, accepting a bare scene config as well
fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let app = AppConfig::load_from_file(path)?;
    if app.scene != SceneConfig::default() {
        return Ok(app);
    }
    let scene = SceneConfig::load_from_file(path)?;
    Ok(AppConfig { scene, ..app })
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_engine::backgrounds::BackgroundKind;

    fn args(list: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(list.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn test_parse_flags() {
        let parsed = args(&["scene.toml", "--frames", "42", "--realtime"]).unwrap();
        assert_eq!(parsed.config, Some(PathBuf::from("scene.toml")));
        assert_eq!(parsed.frames, Some(42));
        assert!(parsed.realtime);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(args(&["--frames"]), Err(ArgsError::Usage(_))));
        assert!(matches!(args(&["--frames", "many"]), Err(ArgsError::Usage(_))));
        assert!(matches!(args(&["--fast"]), Err(ArgsError::Usage(_))));
        assert!(matches!(args(&["a.toml", "b.toml"]), Err(ArgsError::Usage(_))));
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = args(&["--frames", "7"]).unwrap().resolve().unwrap();
        assert_eq!(config.frames, 7);
        assert_eq!(config.scene, SceneConfig::default());
    }

    #[test]
    fn test_nested_scene_table() {
        let config = AppConfig::from_toml_str(
            r#"
            frames = 10
            [scene]
            kind = "heartbeat"
            "#,
        )
        .unwrap();
        assert_eq!(config.frames, 10);
        assert_eq!(config.scene.kind, BackgroundKind::Heartbeat);
    }

    #[test]
    fn test_bare_scene_file() {
        let path = std::env::temp_dir().join(format!("backdrops-bare-{}.toml", std::process::id()));
        std::fs::write(&path, "kind = \"rain\"\nseed = 9\n").unwrap();
        let config = Args { config: Some(path.clone()), ..Args::default() }.resolve().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.scene.kind, BackgroundKind::Rain);
        assert_eq!(config.scene.seed, Some(9));
        assert_eq!(config.frames, AppConfig::default().frames);
    }
}
