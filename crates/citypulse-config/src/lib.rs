//! Shared configuration for the CityPulse CLI and TUI.
//!
//! TOML file + environment overrides, and translation to
//! `citypulse_core::SimulationConfig`. Both binaries depend on this
//! crate; the CLI layers its flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use citypulse_core::{CoreError, DeviceCatalog, DeviceKind, SimulationConfig};

/// Prefix for environment overrides, e.g. `CITYPULSE_SIMULATION__SEED=7`.
pub const ENV_PREFIX: &str = "CITYPULSE_";

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

impl From<CoreError> for ConfigError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidConfig { field, reason } => Self::Validation { field, reason },
            other => Self::Validation {
                field: "simulation".into(),
                reason: other.to_string(),
            },
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Simulation tuning.
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Per-kind population overrides, keyed by tag (`street_light = 1100`).
    #[serde(default)]
    pub catalog: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Fixed seed; omitted means a fresh session every run.
    pub seed: Option<u64>,

    #[serde(default = "default_alert_probability")]
    pub alert_probability: f64,

    #[serde(default = "default_offline_probability")]
    pub initial_offline_probability: f64,

    #[serde(default = "default_alert_capacity")]
    pub alert_capacity: usize,

    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,

    #[serde(default = "default_alert_pool_size")]
    pub alert_pool_size: usize,

    #[serde(default = "default_min_active_devices")]
    pub min_active_devices: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
            alert_probability: default_alert_probability(),
            initial_offline_probability: default_offline_probability(),
            alert_capacity: default_alert_capacity(),
            feed_capacity: default_feed_capacity(),
            alert_pool_size: default_alert_pool_size(),
            min_active_devices: default_min_active_devices(),
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    3_000
}
fn default_alert_probability() -> f64 {
    0.1
}
fn default_offline_probability() -> f64 {
    0.02
}
fn default_alert_capacity() -> usize {
    10
}
fn default_feed_capacity() -> usize {
    50
}
fn default_alert_pool_size() -> usize {
    20
}
fn default_min_active_devices() -> usize {
    2_700
}

impl Config {
    /// Translate to the core's runtime config, validating as we go.
    pub fn to_simulation_config(&self) -> Result<SimulationConfig, ConfigError> {
        let sim = &self.simulation;

        let mut catalog = DeviceCatalog::default();
        for (tag, count) in &self.catalog {
            let kind: DeviceKind = tag.parse().map_err(|_| ConfigError::Validation {
                field: format!("catalog.{tag}"),
                reason: "unknown device type".into(),
            })?;
            catalog = catalog.with_count(kind, *count);
        }

        let config = SimulationConfig {
            tick_interval: Duration::from_millis(sim.tick_interval_ms),
            seed: sim.seed,
            alert_probability: sim.alert_probability,
            initial_offline_probability: sim.initial_offline_probability,
            alert_capacity: sim.alert_capacity,
            feed_capacity: sim.feed_capacity,
            alert_pool_size: sim.alert_pool_size,
            min_active_devices: sim.min_active_devices,
            catalog,
        };
        config.validate()?;
        Ok(config)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "citypulse", "citypulse").map_or_else(
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
    p.push("citypulse");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file is not an
/// error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
