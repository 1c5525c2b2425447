// ── Dashboard domain model ──
//
// Plain data carried from the simulation to the view. Nothing in this
// module mutates state on its own; the engine owns all updates.

pub mod alert;
pub mod analytics;
pub mod device;
pub mod feed;
pub mod metrics;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use citypulse_core::model::*` gives you everything.

// Devices
pub use device::{
    Device, DeviceId, DeviceKind, DevicePayload, DeviceStatus, GRID_COLUMNS, GRID_ROWS,
    GridPoint, Location, PaymentStatus, SignalState,
};

// Counters
pub use metrics::CityMetrics;

// Logs
pub use alert::{Alert, AlertSeverity};
pub use feed::FeedEntry;

// Analytics
pub use analytics::{AnalyticsRange, AnalyticsSeries, AnalyticsView};
