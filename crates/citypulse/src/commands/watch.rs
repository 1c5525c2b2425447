//! `citypulse watch`: run the real-time clock and print each tick.

use std::time::Duration;

use futures::StreamExt;

use citypulse_core::{Dashboard, DashboardSnapshot};

use crate::cli::{OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::Context;

/// One status line per tick.
fn tick_line(s: &DashboardSnapshot) -> String {
    let m = &s.metrics;
    let latest = s
        .feed
        .first()
        .map(|e| format!(" | {} {}: {}", e.icon, e.device, e.message))
        .unwrap_or_default();
    format!(
        "tick {:>4} | active {}/{} | health {:.1}% | alerts {}{latest}",
        s.tick,
        m.active_devices,
        m.total_devices,
        m.network_health,
        s.alerts.len(),
    )
}

pub async fn handle(args: &WatchArgs, ctx: &Context) -> Result<(), CliError> {
    let mut config = ctx.simulation.clone();
    if let Some(ms) = args.interval_ms {
        config.tick_interval = Duration::from_millis(ms.max(1));
    }

    let dashboard = Dashboard::new(config)?;
    // Subscribe before starting so the first tick is never missed.
    let mut ticks = dashboard.snapshots().into_stream().skip(1).take(args.ticks);
    dashboard.start().await?;

    loop {
        tokio::select! {
            next = ticks.next() => {
                let Some(snapshot) = next else { break };
                let line = match ctx.format {
                    OutputFormat::Table | OutputFormat::Plain => tick_line(&snapshot),
                    // One document per tick, so JSON output is line-delimited.
                    OutputFormat::Json | OutputFormat::JsonCompact => {
                        output::render_single(OutputFormat::JsonCompact, snapshot.as_ref(), tick_line, tick_line)?
                    }
                    OutputFormat::Yaml => {
                        format!("---\n{}", output::render_single(ctx.format, snapshot.as_ref(), tick_line, tick_line)?)
                    }
                };
                ctx.print(&line);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    dashboard.stop().await?;
    Ok(())
}
