//! Per-item outcomes of a reconciliation run
//!
//! Every resource and every argument field visited by the engine gets one
//! [`Entry`]. Failures are recorded here instead of aborting the run, so the
//! report is also the place to look for partial success.

use std::fmt;

use serde::Serialize;

use crate::directory::{ResourceId, RuntimeConfigId};

/// The object an entry is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// The property set of a resource adapter.
    Resource { id: ResourceId },
    /// One argument field of a server's runtime configuration.
    Argument {
        config: RuntimeConfigId,
        field: String,
    },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Resource { id } => write!(f, "resource {}", id),
            Target::Argument { config, field } => write!(f, "{} {}", config, field),
        }
    }
}

/// One setting written, or to be written on a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// Property name or argument key.
    pub setting: String,
    /// Value before the write; `None` when an argument token was appended.
    pub previous: Option<String>,
    pub value: String,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.previous {
            Some(previous) => write!(f, "{}: {} -> {}", self.setting, previous, self.value),
            None => write!(f, "{}: (added) {}", self.setting, self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Updated { changes: Vec<Change> },
    /// Every desired value was already in place.
    Unchanged,
    /// The target does not carry this representation.
    Skipped { reason: String },
    /// At least one write was rejected; `changes` lists those that succeeded.
    Failed {
        errors: Vec<String>,
        changes: Vec<Change>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub target: Target,
    pub outcome: Outcome,
}

/// Aggregate of all entries of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    entries: Vec<Entry>,
    committed: bool,
    dry_run: bool,
}

impl ReconciliationReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, target: Target, outcome: Outcome) {
        self.entries.push(Entry { target, outcome });
    }

    pub(crate) fn mark_committed(&mut self) {
        self.committed = true;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Whether the terminal commit succeeded.
    pub fn committed(&self) -> bool {
        self.committed
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn outcome(&self, target: &Target) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| &entry.target == target)
            .map(|entry| &entry.outcome)
    }

    /// Total number of settings written (or planned on a dry run).
    pub fn change_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match &entry.outcome {
                Outcome::Updated { changes } | Outcome::Failed { changes, .. } => changes.len(),
                Outcome::Unchanged | Outcome::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, Outcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// One-line summary, e.g. `7 change(s) across 3 target(s), 1 failed`.
    pub fn summary(&self) -> String {
        let touched = self
            .entries
            .iter()
            .filter(|entry| {
                matches!(
                    entry.outcome,
                    Outcome::Updated { .. } | Outcome::Failed { .. }
                )
            })
            .count();
        let failed = self.failures().count();

        let mut summary = format!(
            "{} change(s) across {} target(s)",
            self.change_count(),
            touched
        );
        if failed > 0 {
            summary.push_str(&format!(", {} failed", failed));
        }
        if self.dry_run {
            summary.push_str(" (dry run, nothing committed)");
        }
        summary
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
