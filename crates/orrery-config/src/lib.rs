//! Startup configuration for the orrery viewer.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Camera and view state are deliberately not part of it.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, CameraConfig, Config, DebugConfig, InputConfig, RenderConfig, TextureConfig,
    WindowConfig, CONFIG_FILE_NAME,
};
pub use error::ConfigError;
