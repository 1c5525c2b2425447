// ── Simulation engine ──
//
// Synchronous core of the dashboard: state, clock and random source in
// one owner. The `Dashboard` controller drives it from a single task;
// the CLI drives it directly.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::clock::{ClockState, SimulationClock, Visibility};
use super::tick::{self, TickOutcome, TickRates};
use crate::command::{Command, CommandResult};
use crate::config::SimulationConfig;
use crate::error::CoreError;
use crate::random::{RandomSource, SeededRandom};
use crate::snapshot::DashboardSnapshot;
use crate::state::DashboardState;

pub struct Engine {
    state: DashboardState,
    clock: SimulationClock,
    rng: Box<dyn RandomSource>,
    rates: TickRates,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("tick", &self.state.tick)
            .field("clock", &self.clock.state())
            .field("devices", &self.state.registry.len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Validate `config`, seed the random source and build initial state.
    pub fn new(config: &SimulationConfig) -> Result<Self, CoreError> {
        let rng = SeededRandom::from_seed_or_entropy(config.seed);
        Self::with_random(config, Box::new(rng))
    }

    /// Build with an explicit random source.
    pub fn with_random(
        config: &SimulationConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, CoreError> {
        Self::with_random_at(config, rng, Utc::now())
    }

    pub fn with_random_at(
        config: &SimulationConfig,
        mut rng: Box<dyn RandomSource>,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let state = DashboardState::seed(config, rng.as_mut(), now);
        debug!(
            devices = state.registry.len(),
            online = state.metrics.active_devices,
            "dashboard state seeded"
        );
        Ok(Self {
            state,
            clock: SimulationClock::new(config.tick_interval),
            rng,
            rates: TickRates {
                alert_probability: config.alert_probability,
                alert_pool_size: config.alert_pool_size,
            },
        })
    }

    // ── Ticks ────────────────────────────────────────────────────────

    /// Fire the timer now. Paused clocks change nothing and yield `None`.
    pub fn fire_tick(&mut self) -> Option<DashboardSnapshot> {
        self.fire_tick_at(Utc::now())
    }

    pub fn fire_tick_at(&mut self, now: DateTime<Utc>) -> Option<DashboardSnapshot> {
        self.advance_at(now)?;
        Some(self.snapshot())
    }

    /// Run one tick without building a snapshot.
    pub fn advance_at(&mut self, now: DateTime<Utc>) -> Option<TickOutcome> {
        if !self.clock.is_running() {
            return None;
        }
        Some(tick::advance(
            &mut self.state,
            self.rng.as_mut(),
            self.rates,
            now,
        ))
    }

    /// Fire `n` ticks back to back and return the final snapshot.
    pub fn run_ticks(&mut self, n: u64) -> DashboardSnapshot {
        for _ in 0..n {
            if self.advance_at(Utc::now()).is_none() {
                break;
            }
        }
        self.snapshot()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn apply(&mut self, command: Command) -> CommandResult {
        self.apply_at(command, Utc::now())
    }

    pub fn apply_at(&mut self, command: Command, now: DateTime<Utc>) -> CommandResult {
        match command {
            Command::SetFilter(filter) => {
                self.state.set_filter(filter, now);
                CommandResult::Ok
            }
            Command::ClearInfoAlerts => CommandResult::Cleared {
                removed: self.state.clear_info_alerts(now),
            },
            Command::ChangeAnalyticsRange(range) => {
                CommandResult::Analytics(self.state.change_analytics_range(range, now))
            }
            Command::SetVisibility(visibility) => {
                let change = self.clock.set_visibility(visibility);
                self.clock_result(change, now)
            }
            Command::SetPaused(held) => {
                let change = self.clock.set_held(held);
                self.clock_result(change, now)
            }
        }
    }

    fn clock_result(&mut self, change: Option<ClockState>, now: DateTime<Utc>) -> CommandResult {
        if let Some(state) = change {
            debug!(%state, "simulation clock changed");
            self.state.updated_at = now;
        }
        CommandResult::Clock(self.clock.state())
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::capture(&self.state, &self.clock)
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn visibility(&self) -> Visibility {
        self.clock.visibility()
    }
}
