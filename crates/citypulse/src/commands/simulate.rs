//! Headless tick runner: `citypulse simulate`.

use std::fmt::Write as _;

use serde::Serialize;

use citypulse_core::{CityMetrics, ClockState, DashboardSnapshot};

use crate::cli::TicksArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

/// What `simulate` reports once the ticks have run.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    tick: u64,
    clock: ClockState,
    metrics: &'a CityMetrics,
    alerts: usize,
    feed: usize,
}

impl<'a> RunSummary<'a> {
    fn new(snapshot: &'a DashboardSnapshot) -> Self {
        Self {
            tick: snapshot.tick,
            clock: snapshot.clock,
            metrics: &snapshot.metrics,
            alerts: snapshot.alerts.len(),
            feed: snapshot.feed.len(),
        }
    }
}

fn detail(s: &RunSummary<'_>) -> String {
    let m = s.metrics;
    let mut out = String::new();
    let _ = writeln!(out, "After {} tick(s)", s.tick);
    let _ = writeln!(out, "  Total Devices:   {}", m.total_devices);
    let _ = writeln!(out, "  Active:          {}", m.active_devices);
    let _ = writeln!(out, "  Offline:         {}", m.offline_devices);
    let _ = writeln!(out, "  Network Health:  {:.1}%", m.network_health);
    let _ = writeln!(
        out,
        "  Alerts:          {} critical, {} warning",
        m.critical_alerts, m.warning_alerts
    );
    let _ = writeln!(out, "  Data Usage:      {:.1} TB/day", m.data_usage_tb);
    let _ = writeln!(out, "  Avg Latency:     {} ms", m.avg_latency_ms);
    let _ = write!(out, "  Logs:            {} alerts, {} feed entries", s.alerts, s.feed);
    out
}

pub fn handle(args: &TicksArgs, ctx: &Context) -> Result<(), CliError> {
    let mut engine = ctx.engine()?;
    let snapshot = engine.run_ticks(args.ticks);
    tracing::info!(ticks = snapshot.tick, "simulation run complete");

    let summary = RunSummary::new(&snapshot);
    let out = output::render_single(ctx.format, &summary, detail, |s| {
        s.metrics.active_devices.to_string()
    })?;
    ctx.print(&out);
    Ok(())
}
