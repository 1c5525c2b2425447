// ── Simulation clock ──
//
// Running/Paused state machine. The clock only decides *whether* ticks
// fire; the engine task owns the actual timer and rebuilds it from the
// clock state after every transition.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClockState {
    Running,
    Paused,
}

/// Whether the host surface is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Tick scheduler state.
///
/// Runs only while the host is visible and no explicit hold is set.
/// A hold (the pause key) survives visibility changes.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    period: Duration,
    visibility: Visibility,
    held: bool,
}

impl SimulationClock {
    /// A visible, unheld clock: starts Running.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            visibility: Visibility::Visible,
            held: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> ClockState {
        if self.held || self.visibility == Visibility::Hidden {
            ClockState::Paused
        } else {
            ClockState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == ClockState::Running
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Hidden pauses, visible resumes. Returns the new state if it changed.
    pub fn set_visibility(&mut self, visibility: Visibility) -> Option<ClockState> {
        self.transition(|clock| clock.visibility = visibility)
    }

    /// Set or release the explicit hold. Returns the new state if it changed.
    pub fn set_held(&mut self, held: bool) -> Option<ClockState> {
        self.transition(|clock| clock.held = held)
    }

    fn transition(&mut self, change: impl FnOnce(&mut Self)) -> Option<ClockState> {
        let before = self.state();
        change(self);
        let after = self.state();
        (before != after).then_some(after)
    }
}
