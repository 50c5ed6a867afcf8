//! # Resource Adapter Tuner CLI
//!
//! This is the binary entry point for the `ra-tuner` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging with `env_logger`.
//! - Executing the appropriate command and translating library errors into
//!   user-facing output and exit codes.
//!
//! The reconciliation logic lives in the `ra_tuner` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
