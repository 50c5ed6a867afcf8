//! Apply command implementation
//!
//! Loads a topology snapshot and a tuning file, runs the reconciliation
//! engine over the selected scope, commits the result back to the snapshot
//! and prints the report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use ra_tuner::config::{self, TuningSpec};
use ra_tuner::directory::MemoryDirectory;
use ra_tuner::engine::Reconciler;
use ra_tuner::error::Error;
use ra_tuner::output::{render_report, OutputConfig};
use ra_tuner::scope::Scope;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Topology snapshot to reconcile; rewritten on commit
    #[arg(short, long, value_name = "PATH", env = "RA_TUNER_TOPOLOGY")]
    pub topology: PathBuf,

    /// Tuning file (defaults to the built-in MQ resource adapter tuning)
    #[arg(short = 'c', long, value_name = "PATH", env = "RA_TUNER_TUNING")]
    pub tuning: Option<PathBuf>,

    /// Only reconcile resources and servers at or beneath this scope
    #[arg(long, value_name = "SCOPE", default_value = "/Cell:/")]
    pub scope: Scope,

    /// Show what would change without writing or committing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Exit with an error if any resource or server could not be updated
    #[arg(long)]
    pub strict: bool,

    /// Also list targets that were already up to date
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, output: &OutputConfig) -> Result<()> {
    let spec = match &args.tuning {
        Some(path) => config::from_file(path)
            .with_context(|| format!("Failed to load tuning file {}", path.display()))?,
        None => TuningSpec::default(),
    };

    let mut directory = MemoryDirectory::open(&args.topology)
        .with_context(|| format!("Failed to load topology {}", args.topology.display()))?;

    let result = Reconciler::new(&spec)
        .with_scope(args.scope)
        .with_dry_run(args.dry_run)
        .run(&mut directory);

    let report = match result {
        Ok(report) => report,
        Err(e @ Error::Commit { .. }) => {
            return Err(e).context(
                "Changes were not committed; the topology may be unchanged or partially updated",
            )
        }
        Err(e) => return Err(e.into()),
    };

    match args.format {
        ReportFormat::Text => print!("{}", render_report(output, &report, args.verbose)),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }

    if args.strict && report.has_failures() {
        anyhow::bail!(
            "{} target(s) could not be updated",
            report.failures().count()
        );
    }

    Ok(())
}
