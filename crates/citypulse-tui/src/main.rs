//! `citypulse-tui`: live terminal dashboard for the CityPulse smart-city
//! IoT simulation.
//!
//! Built on [ratatui](https://ratatui.rs) with snapshots streamed from
//! `citypulse-core`'s [`Dashboard`](citypulse_core::Dashboard). Screens are
//! navigable via number keys (1-3): Overview, City Map, and Analytics.
//!
//! Logs are written to a file (default `/tmp/citypulse-tui.log`) to avoid
//! corrupting the terminal UI. Losing terminal focus pauses the
//! simulation until focus returns.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use citypulse_core::Dashboard;

use crate::app::App;

/// Terminal dashboard for the CityPulse smart-city simulation.
#[derive(Parser, Debug)]
#[command(name = "citypulse-tui", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long, env = "CITYPULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Fixed random seed for a reproducible session
    #[arg(long, env = "CITYPULSE_SEED")]
    seed: Option<u64>,

    /// Time between simulation ticks (e.g. 500ms, 3s)
    #[arg(long, value_parser = humantime::parse_duration)]
    tick_interval: Option<Duration>,

    /// Log file path (defaults to /tmp/citypulse-tui.log)
    #[arg(long, default_value = "/tmp/citypulse-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal is in raw mode. The guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "citypulse_tui={log_level},citypulse_core={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("citypulse-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Build the dashboard. Priority: CLI flags > environment > config file.
fn build_dashboard(cli: &Cli) -> Result<Dashboard> {
    let config = match &cli.config {
        Some(path) => citypulse_config::load_config_from(path)?,
        None => citypulse_config::load_config()?,
    };

    let mut simulation = config.to_simulation_config()?;
    if let Some(seed) = cli.seed {
        simulation.seed = Some(seed);
    }
    if let Some(interval) = cli.tick_interval {
        simulation.tick_interval = interval;
    }

    Ok(Dashboard::new(simulation)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let dashboard = build_dashboard(&cli)?;
    info!(
        devices = dashboard.snapshot().metrics.total_devices,
        seed = ?dashboard.config().seed,
        "starting citypulse-tui"
    );

    let mut app = App::new(dashboard);
    app.run().await?;

    Ok(())
}
