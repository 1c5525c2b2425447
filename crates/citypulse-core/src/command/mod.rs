// ── Command API ──
//
// Every user intent that changes dashboard state is a `Command`. The
// controller forwards commands to the engine task, which applies them
// between ticks and answers over a oneshot channel.

use crate::error::CoreError;
use crate::model::{AnalyticsRange, AnalyticsView};
use crate::simulation::{ClockState, Visibility};
use crate::stream::DeviceFilter;

/// A command envelope sent through the command channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Restrict the map to one kind, or show all.
    SetFilter(DeviceFilter),
    /// Drop every `info` alert.
    ClearInfoAlerts,
    ChangeAnalyticsRange(AnalyticsRange),
    /// Host visibility; hidden pauses the clock.
    SetVisibility(Visibility),
    /// Explicit pause (`true`) or release (`false`).
    SetPaused(bool),
}

impl Command {
    /// Whether applying this command can change the clock state.
    pub fn affects_clock(&self) -> bool {
        matches!(self, Self::SetVisibility(_) | Self::SetPaused(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Ok,
    Cleared { removed: usize },
    Analytics(AnalyticsView),
    Clock(ClockState),
}
