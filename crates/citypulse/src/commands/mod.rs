//! Command dispatch: bridges CLI args -> simulation engine -> output formatting.

pub mod analytics;
pub mod catalog;
pub mod config_cmd;
pub mod devices;
pub mod logs;
pub mod simulate;
pub mod watch;

use std::path::PathBuf;

use clap::ValueEnum;

use citypulse_config::Config;
use citypulse_core::{Engine, SimulationConfig};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Everything a handler needs: the resolved simulation config and
/// presentation settings.
#[derive(Debug)]
pub struct Context {
    pub simulation: SimulationConfig,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Context {
    /// Load config (file + env), then apply flag overrides.
    pub fn from_global(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load_config(global)?;
        let mut simulation = config.to_simulation_config()?;
        if global.seed.is_some() {
            simulation.seed = global.seed;
        }

        let format = match global.output {
            Some(format) => format,
            None => OutputFormat::from_str(&config.defaults.output, true).map_err(|_| {
                CliError::Config {
                    message: format!("unknown output format '{}'", config.defaults.output),
                }
            })?,
        };

        Ok(Self {
            simulation,
            format,
            color: output::should_color(global.color),
            quiet: global.quiet,
        })
    }

    /// Fresh engine for this invocation.
    pub fn engine(&self) -> Result<Engine, CliError> {
        Ok(Engine::new(&self.simulation)?)
    }

    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.quiet);
    }
}

/// The config file in effect: `--config` if given, the platform path
/// otherwise.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(citypulse_config::config_path)
}

pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(citypulse_config::load_config_from(&config_file(global))?)
}

/// Dispatch a simulation-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::list(&args, ctx),
        Command::Device(args) => devices::show(&args, ctx),
        Command::Catalog => catalog::handle(ctx),
        Command::Simulate(args) => simulate::handle(&args, ctx),
        Command::Alerts(args) => logs::alerts(&args, ctx),
        Command::Feed(args) => logs::feed(&args, ctx),
        Command::Analytics(args) => analytics::handle(&args, ctx),
        Command::Watch(args) => watch::handle(&args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
