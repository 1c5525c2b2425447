//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use citypulse_core::{AnalyticsRange, DashboardSnapshot, Device, DeviceFilter, Visibility};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A status-bar notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data events (from the snapshot stream) ────────────────────
    SnapshotUpdated(Arc<DashboardSnapshot>),

    // ── Dashboard intents (forwarded to the engine) ───────────────
    SetFilter(DeviceFilter),
    ClearInfoAlerts,
    ChangeAnalyticsRange(AnalyticsRange),
    TogglePause,
    SetVisibility(Visibility),

    // ── Device selection ──────────────────────────────────────────
    SelectDevice(String),
    DeviceSelected(Arc<Device>),
    CloseDetail,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
