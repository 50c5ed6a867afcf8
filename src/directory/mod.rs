//! # Directory Service
//!
//! The administrative backend that owns the configuration objects. The
//! reconciliation engine only talks to it through the [`DirectoryService`]
//! trait: discovery, reads, staged writes and one terminal commit.
//!
//! Handles returned by the service are opaque identifiers. They are only
//! meaningful to the service that produced them and only for the duration
//! of one session.
//!
//! [`MemoryDirectory`] is an in-memory implementation backed by a YAML
//! topology snapshot; it is what the CLI drives and what the tests use.
//! [`DryRun`] wraps any implementation and discards its writes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scope::Scope;

pub mod dry_run;
pub mod memory;

pub use dry_run::DryRun;
pub use memory::{MemoryDirectory, Topology};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

handle!(
    /// Handle to an adapter-like configuration object.
    ResourceId
);
handle!(
    /// Handle to the property set attached to one resource.
    PropertySetId
);
handle!(
    /// Handle to one property inside a property set.
    PropertyId
);
handle!(
    /// Handle to the runtime configuration of one server.
    RuntimeConfigId
);

/// A name/value entry of a property set, as read from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub value: String,
}

/// The administrative backend consumed by the reconciliation engine.
///
/// Every call is blocking. Mutations are staged and only become durable
/// when [`commit`](DirectoryService::commit) succeeds; dropping the service
/// before that discards them.
pub trait DirectoryService {
    /// List resources of `kind` located at or beneath `scope`.
    fn list_resources(&self, kind: &str, scope: &Scope) -> Result<Vec<ResourceId>>;

    /// The free-text description of a resource, if it has one.
    fn description(&self, resource: &ResourceId) -> Result<Option<String>>;

    /// The property set of a resource, if the resource carries one.
    fn property_set(&self, resource: &ResourceId) -> Result<Option<PropertySetId>>;

    fn list_properties(&self, set: &PropertySetId) -> Result<Vec<Property>>;

    /// Stage a new value for an existing property.
    ///
    /// # Errors
    ///
    /// [`Error::Write`](crate::error::Error::Write) if the property cannot be
    /// modified.
    fn set_property_value(&mut self, property: &PropertyId, value: &str) -> Result<()>;

    /// List runtime configurations of servers at or beneath `scope`.
    fn list_runtime_configs(&self, scope: &Scope) -> Result<Vec<RuntimeConfigId>>;

    /// Names of the argument fields a runtime configuration carries.
    ///
    /// # Errors
    ///
    /// [`Error::Lookup`](crate::error::Error::Lookup) if the configuration
    /// does not exist.
    fn argument_fields(&self, config: &RuntimeConfigId) -> Result<Vec<String>>;

    /// Read one argument field of a runtime configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Lookup`](crate::error::Error::Lookup) if the configuration
    /// has no such field.
    fn argument_string(&self, config: &RuntimeConfigId, field: &str) -> Result<String>;

    /// Stage a new value for an argument field.
    ///
    /// # Errors
    ///
    /// [`Error::Write`](crate::error::Error::Write) if the configuration
    /// cannot be modified.
    fn set_argument_string(
        &mut self,
        config: &RuntimeConfigId,
        field: &str,
        value: &str,
    ) -> Result<()>;

    /// Persist every write staged since the session started.
    ///
    /// # Errors
    ///
    /// [`Error::Commit`](crate::error::Error::Commit) if persistence fails.
    /// The commit is not assumed to be atomic.
    fn commit(&mut self) -> Result<()>;
}
