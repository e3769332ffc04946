//! Configuration loading
//!
//! Both services read the same TOML file. Every key is optional; missing keys
//! fall back to compiled defaults so a fresh install starts with no file at all.
//!
//! # Config file resolution
//!
//! 1. `--config` command-line argument (highest priority)
//! 2. `CUEPLAY_CONFIG` environment variable
//! 3. `<user config dir>/cueplay/config.toml`
//! 4. No file (compiled defaults)
//!
//! Individual settings can still be overridden per service by CLI flags and
//! their `env` fallbacks (see each binary's `Args`).
//!
//! ```toml
//! [ui]
//! port = 5730
//! host_url = "http://127.0.0.1:5000"
//!
//! [host]
//! osc_hostname = "192.168.1.20"
//!
//! [logging]
//! level = "debug"
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CUEPLAY_CONFIG";

/// Shortest playhead polling interval; AbletonOSC updates about every 100 ms
pub const MIN_TICK_MS: u64 = 10;

/// Top-level TOML document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub ui: UiConfig,
    pub host: HostConfig,
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Reject values the services cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.ui.event_capacity == 0 {
            return Err(Error::Config(
                "ui.event_capacity must be at least 1".to_string(),
            ));
        }
        if self.host.tick_ms < MIN_TICK_MS {
            return Err(Error::Config(format!(
                "host.tick_ms must be at least {} (got {})",
                MIN_TICK_MS, self.host.tick_ms
            )));
        }
        Ok(())
    }
}

/// Operator session service (cueplay-ui)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// HTTP port for the operator page and API
    pub port: u16,
    /// Base URL of cueplay-host
    pub host_url: String,
    /// Timeout for every host call except the playhead monitor
    pub request_timeout_ms: u64,
    /// Drop the operator's selection whenever playback stops
    pub clear_selection_on_stop: bool,
    /// Display intents buffered per SSE client
    pub event_capacity: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            port: 5730,
            host_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_ms: 5000,
            clear_selection_on_stop: false,
            event_capacity: 100,
        }
    }
}

impl UiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Playback host service (cueplay-host)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// HTTP port for the host API
    pub port: u16,
    /// Machine running Live with AbletonOSC
    pub osc_hostname: String,
    /// AbletonOSC listen port
    pub osc_port: u16,
    /// Local UDP port AbletonOSC replies to
    pub reply_port: u16,
    /// Playhead polling interval (one Live tick plus processing slack)
    pub tick_ms: u64,
    /// How long to wait for an OSC query reply
    pub query_timeout_ms: u64,
    /// Beats before the stop marker at which the segment counts as finished
    pub stop_tolerance: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            osc_hostname: "127.0.0.1".to_string(),
            osc_port: 11000,
            reply_port: 11001,
            tick_ms: 150,
            query_timeout_ms: 150,
            stop_tolerance: 1.0,
        }
    }
}

impl HostConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where the config file comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by `--config` or `CUEPLAY_CONFIG`; must exist
    Explicit(PathBuf),
    /// Per-user default location; may be absent
    Default(PathBuf),
    /// No location could be determined
    None,
}

/// Resolve the config file location (CLI > env > user config dir)
pub fn resolve_config_path(cli_arg: Option<&Path>) -> ConfigSource {
    if let Some(path) = cli_arg {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return ConfigSource::Explicit(PathBuf::from(path));
        }
    }

    match dirs::config_dir() {
        Some(dir) => ConfigSource::Default(dir.join("cueplay").join("config.toml")),
        None => ConfigSource::None,
    }
}

/// Load configuration from the resolved source
///
/// A missing file at the default location yields defaults. An explicitly
/// named file that is missing or malformed is an error.
pub fn load_config(source: &ConfigSource) -> Result<TomlConfig> {
    match source {
        ConfigSource::Explicit(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            parse_file(path)
        }
        ConfigSource::Default(path) => {
            if path.exists() {
                parse_file(path)
            } else {
                info!(
                    "No config file at {}, using built-in defaults",
                    path.display()
                );
                Ok(TomlConfig::default())
            }
        }
        ConfigSource::None => {
            warn!("Could not determine config directory, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

fn parse_file(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    config.validate()?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
