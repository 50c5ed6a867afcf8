//! # Output Configuration
//!
//! This module controls how the CLI renders a reconciliation report,
//! including color and status markers based on terminal capabilities and
//! user preferences.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::fmt::Write as _;

use console::style;

use crate::report::{Outcome, ReconciliationReport};

/// Output configuration for controlling colors and markers.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and symbols should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    fn marker(&self, outcome: &Outcome) -> String {
        let (symbol, plain) = match outcome {
            Outcome::Updated { .. } => ("✔", "[UPDATED]"),
            Outcome::Unchanged => ("·", "[OK]"),
            Outcome::Skipped { .. } => ("-", "[SKIPPED]"),
            Outcome::Failed { .. } => ("✘", "[FAILED]"),
        };
        if !self.use_color {
            return plain.to_string();
        }
        match outcome {
            Outcome::Updated { .. } => style(symbol).green().to_string(),
            Outcome::Failed { .. } => style(symbol).red().bold().to_string(),
            _ => style(symbol).dim().to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Render a report as human-readable text, one line per target followed by
/// its changes and errors, ending with the summary line.
///
/// Unchanged targets are listed only when `verbose` is set.
pub fn render_report(
    config: &OutputConfig,
    report: &ReconciliationReport,
    verbose: bool,
) -> String {
    let mut out = String::new();

    for entry in report.entries() {
        if !verbose && entry.outcome == Outcome::Unchanged {
            continue;
        }
        let _ = writeln!(out, "{} {}", config.marker(&entry.outcome), entry.target);

        match &entry.outcome {
            Outcome::Updated { changes } => {
                for change in changes {
                    let _ = writeln!(out, "    {}", change);
                }
            }
            Outcome::Skipped { reason } => {
                let _ = writeln!(out, "    {}", reason);
            }
            Outcome::Failed { errors, changes } => {
                for change in changes {
                    let _ = writeln!(out, "    {}", change);
                }
                for error in errors {
                    let _ = writeln!(out, "    error: {}", error);
                }
            }
            Outcome::Unchanged => {}
        }
    }

    let _ = writeln!(out, "{}", report.summary());
    out
}
