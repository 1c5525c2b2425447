//! Alert and feed handlers. Both run the requested ticks first, then
//! list the resulting log newest first.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use citypulse_core::{Alert, Command, CommandResult, FeedEntry};

use crate::cli::{AlertsArgs, FeedArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::Context;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Raised")]
    raised: String,
}

impl AlertRow {
    fn new(a: &Alert, now: DateTime<Utc>, color: bool) -> Self {
        Self {
            severity: output::severity_label(a.severity, color),
            device: a.device.clone(),
            message: a.message.clone(),
            raised: a.relative_time(now),
        }
    }
}

#[derive(Tabled)]
struct FeedRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl FeedRow {
    fn new(e: &FeedEntry) -> Self {
        Self {
            time: e.timestamp.format("%H:%M:%S").to_string(),
            device: format!("{} {}", e.icon, e.device),
            message: e.message.clone(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn alerts(args: &AlertsArgs, ctx: &Context) -> Result<(), CliError> {
    let mut engine = ctx.engine()?;
    engine.run_ticks(args.run.ticks);

    if args.clear_info {
        if let CommandResult::Cleared { removed } = engine.apply(Command::ClearInfoAlerts) {
            tracing::info!(removed, "cleared info alerts");
        }
    }

    let snapshot = engine.snapshot();
    let now = Utc::now();
    let out = output::render_list(
        ctx.format,
        &snapshot.alerts,
        |a| AlertRow::new(a, now, ctx.color),
        |a| a.id.to_string(),
    )?;
    ctx.print(&out);
    Ok(())
}

pub fn feed(args: &FeedArgs, ctx: &Context) -> Result<(), CliError> {
    let mut engine = ctx.engine()?;
    let snapshot = engine.run_ticks(args.run.ticks);

    let entries: Vec<FeedEntry> = snapshot.feed.iter().take(args.limit).cloned().collect();
    let out = render_feed(&entries, ctx.format)?;
    ctx.print(&out);
    Ok(())
}

fn render_feed(entries: &[FeedEntry], format: OutputFormat) -> Result<String, CliError> {
    output::render_list(format, entries, FeedRow::new, |e| {
        format!("{}: {}", e.device, e.message)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(device: &str, message: &str) -> FeedEntry {
        FeedEntry {
            id: 1,
            device: device.to_owned(),
            message: message.to_owned(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 14, 3, 9).unwrap(),
            icon: "🚦".to_owned(),
        }
    }

    #[test]
    fn feed_table_shows_clock_time_and_device() {
        let out = render_feed(&[entry("Traffic Light 001", "Signal changed")], OutputFormat::Table)
            .unwrap();
        assert!(out.contains("14:03:09"));
        assert!(out.contains("🚦 Traffic Light 001"));
        assert!(out.contains("Signal changed"));
    }

    #[test]
    fn feed_plain_is_device_and_message() {
        let entries = [entry("Air Sensor 451", "Reading updated"), entry("Street Light 1521", "Dimmed")];
        let out = render_feed(&entries, OutputFormat::Plain).unwrap();
        assert_eq!(out, "Air Sensor 451: Reading updated\nStreet Light 1521: Dimmed");
    }
}
