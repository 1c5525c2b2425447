//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use citypulse_config::ConfigError;
use citypulse_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(citypulse::not_found),
        help("Run: citypulse {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(citypulse::validation), help("{hint}"))]
    Validation {
        field: String,
        reason: String,
        hint: String,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(citypulse::config),
        help(
            "Check the config file and CITYPULSE_* environment variables.\n\
             Run: citypulse config show"
        )
    )]
    Config { message: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(citypulse::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── Engine ───────────────────────────────────────────────────────

    #[error("Simulation engine failed: {message}")]
    #[diagnostic(code(citypulse::engine))]
    Engine { message: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(citypulse::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config { .. } | Self::ConfigExists { .. } => exit_code::CONFIG,
            Self::Engine { .. } | Self::Io(_) | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices".into(),
            },

            CoreError::UnknownDeviceKind { tag } => CliError::Validation {
                field: "filter".into(),
                reason: format!("unknown device type '{tag}'"),
                hint: "Run: citypulse catalog to see device types".into(),
            },

            CoreError::UnknownRange { value } => CliError::Validation {
                field: "range".into(),
                reason: format!("unknown range '{value}'"),
                hint: "Use one of: 7d, 30d, 90d".into(),
            },

            CoreError::InvalidConfig { field, reason } => CliError::Config {
                message: format!("{field}: {reason}"),
            },

            CoreError::EngineStopped => CliError::Engine {
                message: "engine stopped before the command completed".into(),
            },

            CoreError::Internal(message) => CliError::Engine { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_exit_code_four() {
        let err: CliError = CoreError::DeviceNotFound {
            identifier: "nonexistent_999".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "device 'nonexistent_999' not found");
    }

    #[test]
    fn invalid_config_maps_to_config_exit_code() {
        let err: CliError = CoreError::InvalidConfig {
            field: "feed_capacity".into(),
            reason: "must be at least 1".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    }

    #[test]
    fn unknown_range_is_usage_error() {
        let err: CliError = CoreError::UnknownRange { value: "1y".into() }.into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
