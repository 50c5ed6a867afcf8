//! Property reconciliation
//!
//! Applies a table of desired values to the property set of one resource.
//! Only properties the resource already has are written; desired names the
//! resource does not expose are skipped without error, which lets one table
//! serve adapter revisions that differ in their tunables.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::directory::{DirectoryService, ResourceId};
use crate::error::Result;
use crate::report::{Change, Outcome};

/// Write every desired value whose name exists in the resource's property
/// set.
///
/// One write is issued per matching property. A rejected write is logged and
/// recorded in the returned [`Outcome::Failed`]; the remaining properties are
/// still attempted.
///
/// # Errors
///
/// Returns an error only when the property set itself cannot be read.
pub fn reconcile<D>(
    directory: &mut D,
    resource: &ResourceId,
    desired: &BTreeMap<String, String>,
) -> Result<Outcome>
where
    D: DirectoryService + ?Sized,
{
    let Some(set) = directory.property_set(resource)? else {
        debug!("{} has no property set", resource);
        return Ok(Outcome::Skipped {
            reason: "resource has no property set".to_string(),
        });
    };

    let mut changes = Vec::new();
    let mut errors = Vec::new();
    let mut matched = 0;

    for property in directory.list_properties(&set)? {
        let Some(value) = desired.get(&property.name) else {
            continue;
        };
        matched += 1;

        match directory.set_property_value(&property.id, value) {
            Ok(()) => {
                info!("Setting {}={} on {}", property.name, value, resource);
                if property.value != *value {
                    changes.push(Change {
                        setting: property.name,
                        previous: Some(property.value),
                        value: value.clone(),
                    });
                }
            }
            Err(e) => {
                warn!("Failed to set {} on {}: {}", property.name, resource, e);
                errors.push(e.to_string());
            }
        }
    }

    if matched < desired.len() {
        debug!(
            "{} exposes {} of {} tuned properties",
            resource,
            matched,
            desired.len()
        );
    }

    Ok(if !errors.is_empty() {
        Outcome::Failed { errors, changes }
    } else if changes.is_empty() {
        Outcome::Unchanged
    } else {
        Outcome::Updated { changes }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;

    const SNAPSHOT: &str = r#"
cell: c
resources:
  - id: ra-v85
    kind: J2CResourceAdapter
    scope: /Cell:c/
    properties:
      - { name: maxConnections, value: 10 }
      - { name: startupRetryCount, value: 0 }
      - { name: unrelated, value: keep }
  - id: ra-v70
    kind: J2CResourceAdapter
    scope: /Cell:c/
    properties:
      - { name: unrelated, value: keep }
  - id: ra-locked
    kind: J2CResourceAdapter
    scope: /Cell:c/
    properties:
      - { name: maxConnections, value: 10, read_only: true }
      - { name: startupRetryCount, value: 0 }
  - id: ra-bare
    kind: J2CResourceAdapter
    scope: /Cell:c/
"#;

    fn desired() -> BTreeMap<String, String> {
        [("maxConnections", "2147483647"), ("startupRetryCount", "2147483647")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn value_of(dir: &MemoryDirectory, resource: &str, name: &str) -> String {
        let set = dir.property_set(&ResourceId::new(resource)).unwrap().unwrap();
        dir.list_properties(&set)
            .unwrap()
            .into_iter()
            .find(|p| p.name == name)
            .unwrap()
            .value
    }

    #[test]
    fn test_reconcile_writes_matching_properties() {
        let mut dir = MemoryDirectory::parse(SNAPSHOT).unwrap();
        let outcome = reconcile(&mut dir, &ResourceId::new("ra-v85"), &desired()).unwrap();

        match outcome {
            Outcome::Updated { changes } => assert_eq!(changes.len(), 2),
            other => panic!("expected Updated, got {:?}", other),
        }
        assert_eq!(dir.pending_writes(), 2);
        assert_eq!(value_of(&dir, "ra-v85", "maxConnections"), "2147483647");
        assert_eq!(value_of(&dir, "ra-v85", "unrelated"), "keep");
    }

    #[test]
    fn test_reconcile_missing_properties_is_a_no_op() {
        let mut dir = MemoryDirectory::parse(SNAPSHOT).unwrap();
        let outcome = reconcile(&mut dir, &ResourceId::new("ra-v70"), &desired()).unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(dir.pending_writes(), 0);
    }

    #[test]
    fn test_reconcile_never_creates_properties() {
        let mut dir = MemoryDirectory::parse(SNAPSHOT).unwrap();
        reconcile(&mut dir, &ResourceId::new("ra-v70"), &desired()).unwrap();
        let set = dir.property_set(&ResourceId::new("ra-v70")).unwrap().unwrap();
        assert_eq!(dir.list_properties(&set).unwrap().len(), 1);
    }

    #[test]
    fn test_reconcile_same_value_still_writes_but_reports_unchanged() {
        let mut dir = MemoryDirectory::parse(SNAPSHOT).unwrap();
        let resource = ResourceId::new("ra-v85");
        reconcile(&mut dir, &resource, &desired()).unwrap();
        let outcome = reconcile(&mut dir, &resource, &desired()).unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(dir.pending_writes(), 4);
    }

    #[test]
    fn test_reconcile_continues_after_rejected_write() {
        let mut dir = MemoryDirectory::parse(SNAPSHOT).unwrap();
        let outcome = reconcile(&mut dir, &ResourceId::new("ra-locked"), &desired()).unwrap();

        match outcome {
            Outcome::Failed { errors, changes } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(changes.len(), 1);
                assert_eq!(changes[0].setting, "startupRetryCount");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(value_of(&dir, "ra-locked", "startupRetryCount"), "2147483647");
        assert_eq!(value_of(&dir, "ra-locked", "maxConnections"), "10");
    }

    #[test]
    fn test_reconcile_without_property_set_is_skipped() {
        let mut dir = MemoryDirectory::parse(SNAPSHOT).unwrap();
        let outcome = reconcile(&mut dir, &ResourceId::new("ra-bare"), &desired()).unwrap();
        assert!(matches!(outcome, Outcome::Skipped { .. }));
    }

    #[test]
    fn test_reconcile_logs_rejected_write() {
        testing_logger::setup();
        let mut dir = MemoryDirectory::parse(SNAPSHOT).unwrap();
        reconcile(&mut dir, &ResourceId::new("ra-locked"), &desired()).unwrap();

        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|log| log.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("maxConnections"));
            assert!(warnings[0].body.contains("ra-locked"));
        });
    }
}
