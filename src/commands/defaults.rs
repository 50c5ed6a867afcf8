//! Defaults command implementation
//!
//! Prints the built-in tuning in the same YAML form a tuning file uses, as a
//! starting point for customisation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ra_tuner::config::TuningSpec;

/// Arguments for the defaults command
#[derive(Args, Debug)]
pub struct DefaultsArgs {
    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Execute the defaults command
pub fn execute(args: DefaultsArgs) -> Result<()> {
    let yaml = TuningSpec::default().to_yaml()?;

    match args.output {
        Some(path) => std::fs::write(&path, yaml)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", yaml),
    }
    Ok(())
}
