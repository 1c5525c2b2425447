// ── Core error types ──
//
// The simulation itself is total: generation, ticks, filtering and log
// maintenance cannot fail. Errors surface only at the edges: stale
// lookups from the view, rejected configuration, engine lifecycle.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Unknown device type: {tag}")]
    UnknownDeviceKind { tag: String },

    #[error("Unknown analytics range: {value} (expected 7d, 30d or 90d)")]
    UnknownRange { value: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // ── Engine lifecycle ─────────────────────────────────────────────
    #[error("Simulation engine stopped")]
    EngineStopped,

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether this error means "the thing you asked about does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound { .. })
    }
}
