//! Reconciliation engine
//!
//! Applies one [`TuningSpec`] through both channels the adapter understands,
//! then commits once:
//!
//! 1. **Classification**: find the tuned adapters among all resources of the
//!    configured kind.
//! 2. **Properties**: reconcile each adapter's property set with the
//!    property table.
//! 3. **Arguments**: merge every argument setting into every configured
//!    argument field of every server's runtime configuration, writing a
//!    field only when its text changed.
//! 4. **Commit**: persist all staged writes.
//!
//! Both channels are applied regardless of which one a given server honours.
//! Newer runtimes read the adapter properties, older ones the `-D` system
//! properties; a runtime that reads both sees the same value twice.
//!
//! ## Failures
//!
//! A rejected write affects only its own resource or argument field: it is
//! logged, recorded in the [`ReconciliationReport`], and the run continues.
//! A failed commit is returned as
//! [`Error::Commit`](crate::error::Error::Commit) and fails the run.
//!
//! Known limitation: the Directory Service commit is not assumed to be
//! atomic. After a commit failure the persisted configuration is either the
//! state from before the run or a partial application of it.

use log::{debug, info, warn};

use crate::classify::{classify, Classifier, DescriptionTag};
use crate::config::TuningSpec;
use crate::directory::{DirectoryService, DryRun, RuntimeConfigId};
use crate::error::Result;
use crate::merge::ArgumentToken;
use crate::reconcile::reconcile;
use crate::report::{Change, Outcome, ReconciliationReport, Target};
use crate::scope::Scope;

/// Runs one reconciliation of a [`TuningSpec`] against a directory.
#[derive(Debug, Clone)]
pub struct Reconciler<'a, C = DescriptionTag> {
    spec: &'a TuningSpec,
    classifier: C,
    scope: Scope,
    dry_run: bool,
}

impl<'a> Reconciler<'a, DescriptionTag> {
    /// A reconciler over the whole hierarchy that classifies by the tuning's
    /// description tag.
    pub fn new(spec: &'a TuningSpec) -> Self {
        Self {
            spec,
            classifier: DescriptionTag::new(spec.description_tag()),
            scope: Scope::all(),
            dry_run: false,
        }
    }
}

impl<'a, C: Classifier> Reconciler<'a, C> {
    /// Replace the classifier.
    pub fn with_classifier<K: Classifier>(self, classifier: K) -> Reconciler<'a, K> {
        Reconciler {
            spec: self.spec,
            classifier,
            scope: self.scope,
            dry_run: self.dry_run,
        }
    }

    /// Limit the run to resources and servers at or beneath `scope`.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Compute and report changes without writing or committing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute the run.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigParse`](crate::error::Error::ConfigParse) if the
    ///   tuning is invalid; nothing is written.
    /// - [`Error::Commit`](crate::error::Error::Commit) if the terminal commit
    ///   fails.
    /// - Any error from listing resources or runtime configurations, since
    ///   without the listing there is nothing to isolate.
    pub fn run<D>(&self, directory: &mut D) -> Result<ReconciliationReport>
    where
        D: DirectoryService + ?Sized,
    {
        self.spec.validate()?;
        let tokens = self.spec.argument_tokens()?;
        let mut report = ReconciliationReport::new(self.dry_run);

        info!("Reconciling {} in {}", self.spec.resource_kind(), self.scope);

        if self.dry_run {
            let mut dry = DryRun::new(&*directory);
            self.apply(&mut dry, &tokens, &mut report)?;
            debug!("Dry run left {} write(s) unstaged", dry.discarded());
            info!("{}", report.summary());
            return Ok(report);
        }

        self.apply(directory, &tokens, &mut report)?;
        info!("{}", report.summary());

        directory.commit()?;
        report.mark_committed();
        Ok(report)
    }

    fn apply<D>(
        &self,
        directory: &mut D,
        tokens: &[(ArgumentToken, &str)],
        report: &mut ReconciliationReport,
    ) -> Result<()>
    where
        D: DirectoryService + ?Sized,
    {
        self.tune_resources(directory, report)?;
        self.tune_runtime_configs(directory, tokens, report)
    }

    fn tune_resources<D>(&self, directory: &mut D, report: &mut ReconciliationReport) -> Result<()>
    where
        D: DirectoryService + ?Sized,
    {
        let kind = self.spec.resource_kind();
        let resources = classify(&*directory, kind, &self.scope, &self.classifier)?;
        if resources.is_empty() {
            warn!(
                "No {} described as '{}' found in {}",
                kind,
                self.spec.description_tag(),
                self.scope
            );
            return Ok(());
        }
        if self.spec.properties().is_empty() {
            debug!("No adapter properties configured");
            return Ok(());
        }

        for resource in resources {
            let outcome = match reconcile(directory, &resource, self.spec.properties()) {
                Ok(outcome) => outcome,
                Err(e) if e.is_item_scoped() => {
                    warn!("Failed to reconcile {}: {}", resource, e);
                    Outcome::Failed {
                        errors: vec![e.to_string()],
                        changes: Vec::new(),
                    }
                }
                Err(e) => return Err(e),
            };
            report.record(Target::Resource { id: resource }, outcome);
        }
        Ok(())
    }

    fn tune_runtime_configs<D>(
        &self,
        directory: &mut D,
        tokens: &[(ArgumentToken, &str)],
        report: &mut ReconciliationReport,
    ) -> Result<()>
    where
        D: DirectoryService + ?Sized,
    {
        if tokens.is_empty() {
            debug!("No argument settings configured");
            return Ok(());
        }

        for config in directory.list_runtime_configs(&self.scope)? {
            let present = match directory.argument_fields(&config) {
                Ok(present) => present,
                Err(e) if e.is_item_scoped() => {
                    warn!("Failed to read runtime config {}: {}", config, e);
                    for field in self.spec.argument_fields() {
                        report.record(
                            Target::Argument {
                                config: config.clone(),
                                field: field.clone(),
                            },
                            Outcome::Failed {
                                errors: vec![e.to_string()],
                                changes: Vec::new(),
                            },
                        );
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            for field in self.spec.argument_fields() {
                let outcome = if present.contains(field) {
                    merge_field(directory, &config, field, tokens)?
                } else {
                    debug!("{} has no {} field", config, field);
                    Outcome::Skipped {
                        reason: format!("no {} field", field),
                    }
                };
                report.record(
                    Target::Argument {
                        config: config.clone(),
                        field: field.clone(),
                    },
                    outcome,
                );
            }
        }
        Ok(())
    }
}

/// Merge every token into one argument field and write it back if changed.
fn merge_field<D>(
    directory: &mut D,
    config: &RuntimeConfigId,
    field: &str,
    tokens: &[(ArgumentToken, &str)],
) -> Result<Outcome>
where
    D: DirectoryService + ?Sized,
{
    let current = match directory.argument_string(config, field) {
        Ok(text) => text,
        Err(e) if e.is_item_scoped() => {
            warn!("Failed to read {} of {}: {}", field, config, e);
            return Ok(Outcome::Failed {
                errors: vec![e.to_string()],
                changes: Vec::new(),
            });
        }
        Err(e) => return Err(e),
    };

    let mut merged = current.clone();
    let mut changes = Vec::new();
    for (token, value) in tokens {
        let next = token.merge(&merged, value);
        if next != merged {
            changes.push(Change {
                setting: token.key().to_string(),
                previous: token.current_value(&merged).map(str::to_string),
                value: value.to_string(),
            });
            merged = next;
        }
    }

    if merged == current {
        return Ok(Outcome::Unchanged);
    }

    match directory.set_argument_string(config, field, &merged) {
        Ok(()) => {
            info!("Setting {}=\"{}\" on {}", field, merged, config);
            Ok(Outcome::Updated { changes })
        }
        Err(e) if e.is_item_scoped() => {
            warn!("Failed to set {} on {}: {}", field, config, e);
            Ok(Outcome::Failed {
                errors: vec![e.to_string()],
                changes: Vec::new(),
            })
        }
        Err(e) => Err(e),
    }
}
