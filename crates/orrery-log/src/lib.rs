//! Structured logging for the orrery viewer.
//!
//! Console output with uptime timestamps and module paths, a JSON log file in
//! debug builds, and a reloadable filter so the Debug menu toggle can switch
//! the viewer's own crates to verbose diagnostics at runtime.

use std::path::Path;

use orrery_config::Config;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "orrery.log";

const VERBOSE_TARGETS: [&str; 4] = ["orrery_scene", "orrery_input", "orrery_render", "orrery_app"];

/// Handle to the installed filter. Cheap to clone.
#[derive(Clone)]
pub struct LogHandle {
    base: String,
    reload: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogHandle {
    /// A handle that is not connected to any subscriber. Used when logging
    /// was already initialised elsewhere, and in tests.
    pub fn detached() -> Self {
        Self {
            base: DEFAULT_FILTER.to_string(),
            reload: None,
        }
    }

    /// The filter directives in effect with debug off.
    pub fn base_filter(&self) -> &str {
        &self.base
    }

    /// Switch the viewer crates between the base filter and `debug` level.
    pub fn set_debug(&self, on: bool) {
        let Some(handle) = &self.reload else {
            return;
        };
        let directives = if on {
            debug_filter_directives(&self.base)
        } else {
            self.base.clone()
        };
        match EnvFilter::try_new(&directives) {
            Ok(filter) => {
                if let Err(err) = handle.reload(filter) {
                    tracing::warn!("Failed to change log filter: {err}");
                } else {
                    tracing::info!("Log filter now '{directives}'");
                }
            }
            Err(err) => tracing::warn!("Invalid log filter '{directives}': {err}"),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.debug.log_level`, which takes
/// precedence over [`DEFAULT_FILTER`]. When `debug_build` is set and
/// `log_dir` is writable, a JSON copy of every event goes to
/// `<log_dir>/orrery.log`. Records emitted through the `log` facade are
/// bridged into the same subscriber.
///
/// ```no_run
/// use orrery_log::init_logging;
///
/// let handle = init_logging(None, false, None);
/// handle.set_debug(true);
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) -> LogHandle {
    let base = base_filter_string(std::env::var("RUST_LOG").ok().as_deref(), config);
    let env_filter = EnvFilter::try_new(&base).unwrap_or_else(|_| default_env_filter());
    let (filter_layer, reload_handle) = reload::Layer::new(env_filter);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let file_layer = if debug_build {
        log_dir
            .filter(|dir| std::fs::create_dir_all(dir).is_ok())
            .and_then(|dir| std::fs::File::create(dir.join(LOG_FILE_NAME)).ok())
            .map(|log_file| {
                fmt::layer()
                    .with_writer(log_file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::uptime())
                    .json()
            })
    } else {
        None
    };

    let result = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    match result {
        Ok(()) => LogHandle {
            base,
            reload: Some(reload_handle),
        },
        Err(err) => {
            eprintln!("Logging already initialised: {err}");
            LogHandle::detached()
        }
    }
}

/// Create an `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Pick the base filter from the environment value, then the config.
pub fn base_filter_string(env: Option<&str>, config: Option<&Config>) -> String {
    if let Some(env) = env.filter(|s| !s.trim().is_empty()) {
        return env.to_string();
    }
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// `base` with every viewer crate raised to `debug`.
pub fn debug_filter_directives(base: &str) -> String {
    let mut directives = base.to_string();
    for target in VERBOSE_TARGETS {
        directives.push(',');
        directives.push_str(target);
        directives.push_str("=debug");
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter_str = format!("{}", default_env_filter());
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_env_takes_precedence() {
        let mut config = Config::default();
        config.debug.log_level = "warn".to_string();
        assert_eq!(base_filter_string(Some("trace"), Some(&config)), "trace");
        assert_eq!(base_filter_string(None, Some(&config)), "warn");
        assert_eq!(base_filter_string(Some("  "), Some(&config)), "warn");
    }

    #[test]
    fn test_empty_config_level_uses_default() {
        let mut config = Config::default();
        config.debug.log_level.clear();
        assert_eq!(base_filter_string(None, Some(&config)), DEFAULT_FILTER);
        assert_eq!(base_filter_string(None, None), DEFAULT_FILTER);
    }

    #[test]
    fn test_debug_directives_parse() {
        let directives = debug_filter_directives("info");
        assert!(directives.starts_with("info,"));
        assert!(directives.contains("orrery_scene=debug"));
        assert!(directives.contains("orrery_app=debug"));
        let filter = EnvFilter::try_new(&directives).unwrap();
        assert!(format!("{filter}").contains("orrery_render=debug"));
    }

    #[test]
    fn test_env_filter_parsing() {
        for filter_str in ["info", "debug,orrery_render=trace", "warn,wgpu=error", "error"] {
            assert!(
                EnvFilter::try_new(filter_str).is_ok(),
                "Failed to parse filter: {filter_str}"
            );
        }
    }

    #[test]
    fn test_detached_handle_ignores_toggle() {
        let handle = LogHandle::detached();
        handle.set_debug(true);
        handle.set_debug(false);
        assert_eq!(handle.base_filter(), DEFAULT_FILTER);
    }
}
