//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

const DEFAULT_CYCLE_MS: NonZeroU64 = match NonZeroU64::new(10_000) {
    Some(v) => v,
    None => unreachable!(),
};

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub textures: TextureConfig,
    pub render: RenderConfig,
    pub input: InputConfig,
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title. The context menu appends its entries to it while open.
    pub title: String,
}

/// Mouse-to-camera tuning factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Degrees of rotation per pixel of left-drag.
    pub angle_factor: f32,
    /// Scale change per pixel of middle-drag.
    pub scale_factor: f32,
    /// Floor for the view scale.
    pub min_scale: f32,
    /// Multiplier on `scale_factor` for one scroll-wheel click.
    pub scroll_click_factor: f32,
}

/// Animation timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Length of one animation cycle in milliseconds.
    pub cycle_ms: u64,
}

/// Where body textures are loaded from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Directory holding `sun.bmp`, `earth.bmp`, etc. Relative paths are
    /// resolved against the working directory first, then the data directory.
    pub dir: PathBuf,
    pub generate_mipmaps: bool,
}

/// Geometry resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub sphere_slices: u32,
    pub sphere_stacks: u32,
    pub ring_segments: u32,
    pub axes_length: f32,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Key overrides: action in RON notation (e.g. `"SetAxisColor(Cyan)"`)
    /// to a single key character.
    pub key_bindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Start with the Debug toggle on.
    pub start_in_debug: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            fullscreen: false,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            angle_factor: 1.0,
            scale_factor: 0.005,
            min_scale: 0.05,
            scroll_click_factor: 5.0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cycle_ms: DEFAULT_CYCLE_MS.get(),
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("textures"),
            generate_mipmaps: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sphere_slices: 100,
            sphere_stacks: 100,
            ring_segments: 100,
            axes_length: 1.5,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            start_in_debug: false,
        }
    }
}

impl AnimationConfig {
    /// Cycle length as a non-zero value. A zero in the file falls back to
    /// the default cycle.
    #[must_use]
    pub fn cycle(&self) -> NonZeroU64 {
        NonZeroU64::new(self.cycle_ms).unwrap_or_else(|| {
            log::warn!(
                "animation.cycle_ms must be positive, using {}",
                DEFAULT_CYCLE_MS
            );
            DEFAULT_CYCLE_MS
        })
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Default config directory for the current user (`<config>/orrery`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("orrery"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read the file. Returns `Some(new_config)` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE_NAME))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Resolve the texture directory: absolute paths and existing relative
    /// paths are used as-is, otherwise the path is looked up under `data_dir`.
    pub fn texture_dir(&self, data_dir: &Path) -> PathBuf {
        let dir = &self.textures.dir;
        if dir.is_absolute() || dir.exists() {
            dir.clone()
        } else {
            data_dir.join(dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 600"));
        assert!(ron_str.contains("cycle_ms: 10000"));
        assert!(ron_str.contains("min_scale: 0.05"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config
            .input
            .key_bindings
            .insert("ToggleTexturing".to_string(), "x".to_string());
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (width: 800), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_cycle_falls_back() {
        let animation = AnimationConfig { cycle_ms: 0 };
        assert_eq!(animation.cycle().get(), 10_000);
        let animation = AnimationConfig { cycle_ms: 2_000 };
        assert_eq!(animation.cycle().get(), 2_000);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1024;
        config.camera.min_scale = 0.1;
        config.textures.dir = PathBuf::from("/opt/orrery/textures");

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.animation.cycle_ms = 5_000;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.animation.cycle_ms), Some(5_000));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// orrery settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_texture_dir_falls_back_to_data_dir() {
        let mut config = Config::default();
        config.textures.dir = PathBuf::from("no-such-texture-dir");
        let data = Path::new("/var/lib/orrery");
        assert_eq!(
            config.texture_dir(data),
            PathBuf::from("/var/lib/orrery/no-such-texture-dir")
        );

        config.textures.dir = PathBuf::from("/abs/textures");
        assert_eq!(config.texture_dir(data), PathBuf::from("/abs/textures"));
    }
}
