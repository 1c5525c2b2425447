//! `citypulse`: scriptable access to the CityPulse smart-city simulation.
//!
//! Every invocation builds a fresh session from config (plus `--seed`),
//! runs it for as many ticks as the command asks, and prints the result.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Diagnostics go to stderr so stdout stays parseable. `RUST_LOG` wins
/// over `-v`.
fn init_tracing(verbosity: u8) {
    let level = ["warn", "info", "debug"]
        .get(usize::from(verbosity))
        .copied()
        .unwrap_or("trace");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("citypulse={level},citypulse_core={level},citypulse_config={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "citypulse", &mut std::io::stdout());
            Ok(())
        }

        // Config commands only need the file, not a simulation
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        cmd => {
            let ctx = commands::Context::from_global(&cli.global)?;
            tracing::debug!(command = ?cmd, seed = ?ctx.simulation.seed, "dispatching command");
            commands::dispatch(cmd, &ctx).await
        }
    }
}
