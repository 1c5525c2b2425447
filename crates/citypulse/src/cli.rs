//! Clap derive structures for the `citypulse` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// citypulse -- inspect and run the smart-city dashboard simulation
#[derive(Debug, Parser)]
#[command(
    name = "citypulse",
    version,
    about = "Simulate a smart-city IoT fleet from the command line",
    long_about = "Generates a simulated fleet of municipal IoT devices and runs the\n\
        dashboard simulation headlessly: list devices, step the clock, and\n\
        inspect alerts, the live feed and analytics.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to a config file (defaults to the platform config dir)
    #[arg(long, env = "CITYPULSE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Seed for the random source; the same seed reproduces a session
    #[arg(long, env = "CITYPULSE_SEED", global = true)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', env = "CITYPULSE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List generated devices
    #[command(alias = "ls")]
    Devices(DevicesArgs),

    /// Show one device in detail
    Device(DeviceArgs),

    /// Show the device catalog
    Catalog,

    /// Run ticks back to back and print the resulting metrics
    #[command(alias = "sim")]
    Simulate(TicksArgs),

    /// Run ticks, then list alerts
    Alerts(AlertsArgs),

    /// Run ticks, then show the live device feed
    Feed(FeedArgs),

    /// Show analytics series for a range
    Analytics(AnalyticsArgs),

    /// Run the real-time clock and print metrics as ticks arrive
    Watch(WatchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Arguments ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Device type tag (traffic_light, air_sensor, ...) or "all"
    #[arg(long, short = 'f', default_value = "all")]
    pub filter: String,

    /// Only list offline devices
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Device id, e.g. traffic_light_001
    pub id: String,
}

#[derive(Debug, Args)]
pub struct TicksArgs {
    /// Number of ticks to run
    #[arg(long, short = 'n', default_value_t = 1)]
    pub ticks: u64,
}

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(flatten)]
    pub run: TicksArgs,

    /// Remove info alerts before listing
    #[arg(long)]
    pub clear_info: bool,
}

#[derive(Debug, Args)]
pub struct FeedArgs {
    #[command(flatten)]
    pub run: TicksArgs,

    /// Show at most this many entries
    #[arg(long, short = 'l', default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    /// Range: 7d, 30d or 90d
    #[arg(long, short = 'r', default_value = "7d")]
    pub range: String,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many ticks
    #[arg(long, short = 'n', default_value_t = 5)]
    pub ticks: usize,

    /// Override the tick interval (milliseconds)
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
