//! Configuration for devstore tools.
//!
//! Layered with figment: built-in defaults, then the TOML file, then
//! `DEVSTORE_`-prefixed environment variables. Nested keys use a double
//! underscore, so `DEVSTORE_CHANNEL__TIMEOUT_MS` sets `channel.timeout_ms`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every environment variable read into [`Config`].
pub const ENV_PREFIX: &str = "DEVSTORE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub channel: ChannelConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default filter directive when neither `RUST_LOG` nor `-v` is given.
    #[serde(default = "default_level")]
    pub level: String,

    /// "text" or "json".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

impl LogConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

fn default_level() -> String {
    "warn".into()
}
fn default_format() -> String {
    "text".into()
}

/// Availability gate settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChannelConfig {
    /// Default bound on a readiness wait.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Pause between connection probes.
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            probe_interval_ms: default_probe_interval_ms(),
        }
    }
}

impl ChannelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }
}

fn default_timeout_ms() -> u64 {
    5_000
}
fn default_probe_interval_ms() -> u64 {
    250
}

// ── Validation ──────────────────────────────────────────────────────

impl Config {
    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.probe_interval_ms == 0 {
            return Err(ConfigError::Validation {
                field: "channel.probe_interval_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }

        match self.log.format.to_ascii_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Validation {
                field: "log.format".into(),
                reason: format!("expected 'text' or 'json', got '{other}'"),
            }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "devstore", "devstore").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("devstore");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the platform path and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` and the environment.
///
/// A missing file is not an error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parents.
///
/// Pass [`config_path()`] to write the file [`load_config`] reads.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
