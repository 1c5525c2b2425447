// ── Dashboard controller ──
//
// Lifecycle management for a simulation session. The engine lives in a
// single background task that multiplexes timer ticks and commands, so
// dashboard state is never touched concurrently. Views subscribe to the
// snapshots it publishes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::SimulationConfig;
use crate::error::CoreError;
use crate::model::{AnalyticsRange, AnalyticsView, Device};
use crate::simulation::{ClockState, Engine, SimulationClock, Visibility};
use crate::snapshot::DashboardSnapshot;
use crate::stream::{DeviceFilter, SnapshotStream};

const COMMAND_CHANNEL_SIZE: usize = 64;

type SnapshotSender = Arc<watch::Sender<Arc<DashboardSnapshot>>>;

// ── Dashboard ────────────────────────────────────────────────────

/// The main entry point for views.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Owns the engine while
/// stopped, hands it to a background task on [`start`](Self::start), and
/// takes it back on [`stop`](Self::stop) so a later start continues the
/// same session.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: SimulationConfig,
    snapshots: SnapshotSender,
    lifecycle: Mutex<Lifecycle>,
    started: AtomicBool,
}

#[derive(Default)]
struct Lifecycle {
    idle: Option<Engine>,
    running: Option<RunningEngine>,
}

struct RunningEngine {
    command_tx: mpsc::Sender<CommandEnvelope>,
    cancel: CancellationToken,
    handle: JoinHandle<Engine>,
}

impl Dashboard {
    /// Validate `config`, generate the fleet and seed initial state.
    /// Does NOT start ticking -- call [`start()`](Self::start).
    pub fn new(config: SimulationConfig) -> Result<Self, CoreError> {
        let engine = Engine::new(&config)?;
        Ok(Self::with_engine(config, engine))
    }

    /// Wrap a prepared engine (custom random source, pre-run ticks).
    pub fn with_engine(config: SimulationConfig, engine: Engine) -> Self {
        let (snapshots, _) = watch::channel(Arc::new(engine.snapshot()));
        Self {
            inner: Arc::new(DashboardInner {
                config,
                snapshots: Arc::new(snapshots),
                lifecycle: Mutex::new(Lifecycle {
                    idle: Some(engine),
                    running: None,
                }),
                started: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the engine task. Starting an already-started dashboard is a
    /// no-op, so the timer is never scheduled twice.
    pub async fn start(&self) -> Result<(), CoreError> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        if lifecycle.running.is_some() {
            debug!("dashboard already started");
            return Ok(());
        }
        let engine = lifecycle
            .idle
            .take()
            .ok_or_else(|| CoreError::Internal("engine unavailable".into()))?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let period = engine.clock().period();
        let handle = tokio::spawn(engine_task(
            engine,
            command_rx,
            cancel.clone(),
            Arc::clone(&self.inner.snapshots),
        ));

        lifecycle.running = Some(RunningEngine {
            command_tx,
            cancel,
            handle,
        });
        self.inner.started.store(true, Ordering::Release);
        info!(period_ms = period.as_millis(), "simulation engine started");
        Ok(())
    }

    /// Cancel the timer, join the task and keep its engine for a later
    /// start. No tick fires after this returns.
    pub async fn stop(&self) -> Result<(), CoreError> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        let Some(running) = lifecycle.running.take() else {
            return Ok(());
        };
        self.inner.started.store(false, Ordering::Release);
        running.cancel.cancel();

        match running.handle.await {
            Ok(engine) => {
                lifecycle.idle = Some(engine);
                info!("simulation engine stopped");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "simulation engine task failed");
                Err(CoreError::Internal(format!("engine task failed: {e}")))
            }
        }
    }

    /// Whether the engine task is alive.
    pub fn is_started(&self) -> bool {
        self.inner.started.load(Ordering::Acquire)
    }

    /// Whether ticks are currently being produced.
    pub fn is_running(&self) -> bool {
        self.is_started() && self.snapshot().is_running()
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Apply a command. While started, it is queued to the engine task
    /// and applied between ticks; while stopped, it is applied directly.
    /// Either way a fresh snapshot is published before this returns.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        let command_tx = lifecycle.running.as_ref().map(|r| r.command_tx.clone());
        if let Some(command_tx) = command_tx {
            drop(lifecycle);

            let (tx, rx) = tokio::sync::oneshot::channel();
            command_tx
                .send(CommandEnvelope {
                    command,
                    response_tx: tx,
                })
                .await
                .map_err(|_| CoreError::EngineStopped)?;
            return rx.await.map_err(|_| CoreError::EngineStopped)?;
        }

        let engine = lifecycle
            .idle
            .as_mut()
            .ok_or_else(|| CoreError::Internal("engine unavailable".into()))?;
        let result = engine.apply(command);
        publish(&self.inner.snapshots, engine.snapshot());
        Ok(result)
    }

    pub async fn set_filter(&self, filter: DeviceFilter) -> Result<(), CoreError> {
        self.execute(Command::SetFilter(filter)).await.map(|_| ())
    }

    /// Returns how many `info` alerts were removed.
    pub async fn clear_info_alerts(&self) -> Result<usize, CoreError> {
        match self.execute(Command::ClearInfoAlerts).await? {
            CommandResult::Cleared { removed } => Ok(removed),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn change_analytics_range(
        &self,
        range: AnalyticsRange,
    ) -> Result<AnalyticsView, CoreError> {
        match self.execute(Command::ChangeAnalyticsRange(range)).await? {
            CommandResult::Analytics(view) => Ok(view),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn set_visibility(&self, visibility: Visibility) -> Result<ClockState, CoreError> {
        self.clock_command(Command::SetVisibility(visibility)).await
    }

    pub async fn set_paused(&self, paused: bool) -> Result<ClockState, CoreError> {
        self.clock_command(Command::SetPaused(paused)).await
    }

    async fn clock_command(&self, command: Command) -> Result<ClockState, CoreError> {
        match self.execute(command).await? {
            CommandResult::Clock(state) => Ok(state),
            other => Err(unexpected(&other)),
        }
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Look a device up in the latest snapshot. Stale ids are
    /// `DeviceNotFound`, never a panic.
    pub fn select_device(&self, id: &str) -> Result<Arc<Device>, CoreError> {
        self.snapshot().find_device(id)
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        self.inner.snapshots.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    pub fn snapshots(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.snapshots.subscribe())
    }
}

fn unexpected(result: &CommandResult) -> CoreError {
    CoreError::Internal(format!("unexpected command result: {result:?}"))
}

/// Replace the current snapshot. Works with zero subscribers.
fn publish(snapshots: &SnapshotSender, snapshot: DashboardSnapshot) {
    snapshots.send_replace(Arc::new(snapshot));
}

// ── Engine task ──────────────────────────────────────────────────

async fn engine_task(
    mut engine: Engine,
    mut command_rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
    snapshots: SnapshotSender,
) -> Engine {
    let mut timer = schedule(engine.clock());

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = command_rx.recv() => {
                let Some(envelope) = envelope else { break };
                let affects_clock = envelope.command.affects_clock();
                let was_running = engine.clock().is_running();
                let result = engine.apply(envelope.command);
                publish(&snapshots, engine.snapshot());
                let _ = envelope.response_tx.send(Ok(result));

                if affects_clock && engine.clock().is_running() != was_running {
                    timer = schedule(engine.clock());
                }
            }
            () = next_tick(&mut timer) => {
                if let Some(snapshot) = engine.fire_tick() {
                    publish(&snapshots, snapshot);
                }
            }
        }
    }

    engine
}

/// A fresh timer whose first tick is one full period away, or `None`
/// while paused. Missed ticks are skipped, never replayed.
fn schedule(clock: &SimulationClock) -> Option<Interval> {
    clock.is_running().then(|| {
        let period = clock.period();
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    })
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
