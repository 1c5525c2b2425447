// ── Simulation configuration ──
//
// Describes *how* the simulation runs: timer period, seed, rates and
// capacities. Never touches disk; the CLI/TUI builds one (usually from
// `citypulse-config`) and hands it in.

use std::time::Duration;

use crate::catalog::DeviceCatalog;
use crate::error::CoreError;

/// Tuning for a dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Period between ticks.
    pub tick_interval: Duration,
    /// Seed for the random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Chance that a tick raises an alert.
    pub alert_probability: f64,
    /// Chance that a generated device starts offline.
    pub initial_offline_probability: f64,
    pub alert_capacity: usize,
    pub feed_capacity: usize,
    /// Alerts are raised against the first N registry entries.
    pub alert_pool_size: usize,
    /// Lower bound for the active-device counter (capped at the total).
    pub min_active_devices: usize,
    /// Device types and populations.
    pub catalog: DeviceCatalog,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(3_000),
            seed: None,
            alert_probability: 0.1,
            initial_offline_probability: 0.02,
            alert_capacity: 10,
            feed_capacity: 50,
            alert_pool_size: 20,
            min_active_devices: 2_700,
            catalog: DeviceCatalog::default(),
        }
    }
}

impl SimulationConfig {
    /// Same config with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.tick_interval.is_zero() {
            return Err(invalid("tick_interval", "must be greater than zero"));
        }
        for (field, p) in [
            ("alert_probability", self.alert_probability),
            ("initial_offline_probability", self.initial_offline_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, &format!("{p} is outside [0, 1]")));
            }
        }
        if self.alert_capacity == 0 {
            return Err(invalid("alert_capacity", "must be at least 1"));
        }
        if self.feed_capacity == 0 {
            return Err(invalid("feed_capacity", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> CoreError {
    CoreError::InvalidConfig {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}
