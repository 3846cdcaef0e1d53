//! Orrery: an animated solar system viewer.

use clap::Parser;
use orrery_app::platform::PlatformDirs;
use orrery_app::window::run_with_config;
use orrery_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_with_config(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
    }

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_handle =
        orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    tracing::info!("Config directory: {}", dirs.config_dir.display());

    let texture_dir = config.texture_dir(&dirs.data_dir);
    if let Err(e) = run_with_config(config, texture_dir, log_handle) {
        tracing::error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
