//! In-memory Directory Service backed by a topology snapshot
//!
//! A snapshot describes one cell: its resources with their property sets and
//! the runtime configuration of each server.
//!
//! ```yaml
//! cell: Cell01
//! resources:
//!   - id: mqra-cell
//!     kind: J2CResourceAdapter
//!     scope: /Cell:Cell01/
//!     description: Built In WebSphere MQ Resource Adapter
//!     properties:
//!       - name: maxConnections
//!         value: 10
//! runtime_configs:
//!   - id: jvm-server1
//!     scope: /Cell:Cell01/Node:Node01/Server:server1/
//!     arguments:
//!       genericJvmArguments: -Xmx512m
//!       debugArgs: ""
//! ```
//!
//! Writes go to a staged copy of the topology. [`commit`] replaces the
//! committed topology with the staged one and, when the directory was opened
//! from a file, writes the snapshot back to that file.
//!
//! [`commit`]: DirectoryService::commit

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{DirectoryService, Property, PropertyId, PropertySetId, ResourceId, RuntimeConfigId};
use crate::error::{Error, Result};
use crate::scope::Scope;

const PROPERTY_SET_SUFFIX: &str = "#propertySet";
const PROPERTY_SEPARATOR: &str = "#propertySet#";

fn is_false(value: &bool) -> bool {
    !*value
}

/// Snapshot of one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Topology {
    pub cell: String,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
    #[serde(default)]
    pub runtime_configs: Vec<RuntimeConfigEntry>,
}

/// One resource in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceEntry {
    pub id: String,
    pub kind: String,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `None` when the resource carries no property set at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyEntry>>,
    /// Rejects every property write on this resource.
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyEntry {
    pub name: String,
    /// Kept as written; unquoted numbers are not normalised.
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

/// The runtime configuration of one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfigEntry {
    pub id: String,
    pub scope: Scope,
    #[serde(default)]
    pub arguments: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl Topology {
    /// Check handle uniqueness and fill in wildcard cell levels.
    fn normalize(mut self) -> Result<Self> {
        if self.cell.trim().is_empty() {
            return Err(Error::config("topology cell name must not be empty"));
        }

        let mut seen = HashSet::new();
        for resource in &mut self.resources {
            check_id(&resource.id, "resource")?;
            if !seen.insert(resource.id.clone()) {
                return Err(Error::config(format!("duplicate resource id '{}'", resource.id)));
            }
            resource.scope = resource.scope.in_cell(&self.cell);

            if let Some(properties) = &resource.properties {
                let mut names = HashSet::new();
                for property in properties {
                    if !names.insert(property.name.as_str()) {
                        return Err(Error::config(format!(
                            "duplicate property '{}' on resource '{}'",
                            property.name, resource.id
                        )));
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        for config in &mut self.runtime_configs {
            check_id(&config.id, "runtime config")?;
            if !seen.insert(config.id.clone()) {
                return Err(Error::config(format!(
                    "duplicate runtime config id '{}'",
                    config.id
                )));
            }
            config.scope = config.scope.in_cell(&self.cell);
        }

        Ok(self)
    }

    fn resource(&self, id: &str) -> Result<&ResourceEntry> {
        self.resources
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| lookup(id, "no such resource"))
    }

    fn resource_mut(&mut self, id: &str) -> Result<&mut ResourceEntry> {
        self.resources
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| lookup(id, "no such resource"))
    }

    fn runtime_config(&self, id: &str) -> Result<&RuntimeConfigEntry> {
        self.runtime_configs
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| lookup(id, "no such runtime config"))
    }

    fn runtime_config_mut(&mut self, id: &str) -> Result<&mut RuntimeConfigEntry> {
        self.runtime_configs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| lookup(id, "no such runtime config"))
    }
}

fn check_id(id: &str, what: &str) -> Result<()> {
    if id.trim().is_empty() || id.contains('#') {
        return Err(Error::ConfigParse {
            message: format!("invalid {} id '{}'", what, id),
            hint: Some("ids must be non-empty and must not contain '#'".to_string()),
        });
    }
    Ok(())
}

fn lookup(target: &str, message: &str) -> Error {
    Error::Lookup {
        target: target.to_string(),
        message: message.to_string(),
    }
}

/// Directory Service over an in-memory [`Topology`].
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    committed: Topology,
    staged: Topology,
    path: Option<PathBuf>,
    pending: usize,
}

impl MemoryDirectory {
    /// Create a directory over `topology`; commits stay in memory.
    pub fn new(topology: Topology) -> Result<Self> {
        let topology = topology.normalize()?;
        Ok(Self {
            staged: topology.clone(),
            committed: topology,
            path: None,
            pending: 0,
        })
    }

    /// Parse a snapshot from YAML; commits stay in memory.
    pub fn parse(yaml_content: &str) -> Result<Self> {
        let topology: Topology = serde_yaml::from_str(yaml_content)?;
        Self::new(topology)
    }

    /// Load a snapshot from `path`; commits write the snapshot back to it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut directory = Self::parse(&content)?;
        directory.path = Some(path.to_path_buf());
        Ok(directory)
    }

    /// Redirect commits to `path`.
    pub fn bind(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The last committed state.
    pub fn topology(&self) -> &Topology {
        &self.committed
    }

    /// The state including uncommitted writes.
    pub fn staged(&self) -> &Topology {
        &self.staged
    }

    /// Number of writes staged since the last commit.
    pub fn pending_writes(&self) -> usize {
        self.pending
    }
}

impl DirectoryService for MemoryDirectory {
    fn list_resources(&self, kind: &str, scope: &Scope) -> Result<Vec<ResourceId>> {
        Ok(self
            .staged
            .resources
            .iter()
            .filter(|r| r.kind == kind && scope.contains(&r.scope))
            .map(|r| ResourceId::new(r.id.as_str()))
            .collect())
    }

    fn description(&self, resource: &ResourceId) -> Result<Option<String>> {
        Ok(self.staged.resource(resource.as_str())?.description.clone())
    }

    fn property_set(&self, resource: &ResourceId) -> Result<Option<PropertySetId>> {
        let entry = self.staged.resource(resource.as_str())?;
        Ok(entry
            .properties
            .as_ref()
            .map(|_| PropertySetId::new(format!("{}{}", entry.id, PROPERTY_SET_SUFFIX))))
    }

    fn list_properties(&self, set: &PropertySetId) -> Result<Vec<Property>> {
        let resource_id = set
            .as_str()
            .strip_suffix(PROPERTY_SET_SUFFIX)
            .ok_or_else(|| lookup(set.as_str(), "not a property set handle"))?;
        let entry = self.staged.resource(resource_id)?;
        let properties = entry
            .properties
            .as_ref()
            .ok_or_else(|| lookup(set.as_str(), "resource has no property set"))?;

        Ok(properties
            .iter()
            .map(|p| Property {
                id: PropertyId::new(format!("{}{}{}", resource_id, PROPERTY_SEPARATOR, p.name)),
                name: p.name.clone(),
                value: p.value.clone(),
            })
            .collect())
    }

    fn set_property_value(&mut self, property: &PropertyId, value: &str) -> Result<()> {
        let (resource_id, name) = property
            .as_str()
            .split_once(PROPERTY_SEPARATOR)
            .ok_or_else(|| lookup(property.as_str(), "not a property handle"))?;
        let entry = self.staged.resource_mut(resource_id)?;
        let resource_read_only = entry.read_only;
        let slot = entry
            .properties
            .as_mut()
            .and_then(|props| props.iter_mut().find(|p| p.name == name))
            .ok_or_else(|| lookup(property.as_str(), "no such property"))?;

        if resource_read_only || slot.read_only {
            return Err(Error::Write {
                target: property.to_string(),
                message: "property is not modifiable".to_string(),
            });
        }

        slot.value = value.to_string();
        self.pending += 1;
        Ok(())
    }

    fn list_runtime_configs(&self, scope: &Scope) -> Result<Vec<RuntimeConfigId>> {
        Ok(self
            .staged
            .runtime_configs
            .iter()
            .filter(|c| scope.contains(&c.scope))
            .map(|c| RuntimeConfigId::new(c.id.as_str()))
            .collect())
    }

    fn argument_fields(&self, config: &RuntimeConfigId) -> Result<Vec<String>> {
        Ok(self
            .staged
            .runtime_config(config.as_str())?
            .arguments
            .keys()
            .cloned()
            .collect())
    }

    fn argument_string(&self, config: &RuntimeConfigId, field: &str) -> Result<String> {
        self.staged
            .runtime_config(config.as_str())?
            .arguments
            .get(field)
            .cloned()
            .ok_or_else(|| lookup(&format!("{}.{}", config, field), "no such argument field"))
    }

    fn set_argument_string(
        &mut self,
        config: &RuntimeConfigId,
        field: &str,
        value: &str,
    ) -> Result<()> {
        let entry = self.staged.runtime_config_mut(config.as_str())?;
        if entry.read_only {
            return Err(Error::Write {
                target: format!("{}.{}", config, field),
                message: "runtime config is not modifiable".to_string(),
            });
        }

        let slot = entry
            .arguments
            .get_mut(field)
            .ok_or_else(|| lookup(&format!("{}.{}", config, field), "no such argument field"))?;
        *slot = value.to_string();
        self.pending += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if let Some(path) = &self.path {
            let yaml = serde_yaml::to_string(&self.staged).map_err(|e| Error::Commit {
                message: format!("cannot serialize topology: {}", e),
            })?;
            std::fs::write(path, yaml).map_err(|e| Error::Commit {
                message: format!("cannot write {}: {}", path.display(), e),
            })?;
            debug!("Wrote topology snapshot to {}", path.display());
        }

        info!("Committed {} staged write(s)", self.pending);
        self.committed = self.staged.clone();
        self.pending = 0;
        Ok(())
    }
}
