// citypulse-core: Simulation core of the CityPulse dashboard, shared by the CLI and TUI.

pub mod catalog;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod random;
pub mod simulation;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{DeviceCatalog, DeviceType};
pub use command::{Command, CommandResult};
pub use config::SimulationConfig;
pub use controller::Dashboard;
pub use error::CoreError;
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use simulation::{ClockState, Engine, SimulationClock, Visibility};
pub use snapshot::{DashboardSnapshot, MAX_MAP_MARKERS};
pub use state::DashboardState;
pub use store::{AlertLog, BoundedLog, DeviceRegistry, FeedLog};
pub use stream::{DeviceFilter, SnapshotStream};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Devices
    Device, DeviceId, DeviceKind, DevicePayload, DeviceStatus, GridPoint, Location,
    // Logs
    Alert, AlertSeverity, FeedEntry,
    // Counters and analytics
    AnalyticsRange, AnalyticsView, CityMetrics,
};
