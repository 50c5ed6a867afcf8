//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Resource Adapter Tuner - Reconcile MQ resource adapter tuning across a cell
#[derive(Parser, Debug)]
#[command(name = "ra-tuner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply the tuning to every matching adapter and server in a topology
    Apply(commands::apply::ApplyArgs),

    /// Merge one -D<key>=<value> setting into an argument string
    Merge(commands::merge::MergeArgs),

    /// Print the built-in tuning as YAML
    Defaults(commands::defaults::DefaultsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = ra_tuner::output::OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Apply(args) => commands::apply::execute(args, &output),
            Commands::Merge(args) => commands::merge::execute(args),
            Commands::Defaults(args) => commands::defaults::execute(args),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second initialisation only happens in tests; keep the first logger.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
