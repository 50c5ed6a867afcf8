//! Read-through directory that discards writes
//!
//! Wrapping a [`DirectoryService`] in [`DryRun`] lets the engine compute and
//! report every change without staging anything on the real service. Reads
//! are forwarded; writes are logged and accepted; commit does nothing.
//!
//! A write the real service would reject is reported as planned.

use log::debug;

use super::{DirectoryService, Property, PropertyId, PropertySetId, ResourceId, RuntimeConfigId};
use crate::error::Result;
use crate::scope::Scope;

pub struct DryRun<'a, D: ?Sized> {
    inner: &'a D,
    discarded: usize,
}

impl<'a, D: DirectoryService + ?Sized> DryRun<'a, D> {
    pub fn new(inner: &'a D) -> Self {
        Self { inner, discarded: 0 }
    }

    /// Number of writes that were discarded.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl<D: DirectoryService + ?Sized> DirectoryService for DryRun<'_, D> {
    fn list_resources(&self, kind: &str, scope: &Scope) -> Result<Vec<ResourceId>> {
        self.inner.list_resources(kind, scope)
    }

    fn description(&self, resource: &ResourceId) -> Result<Option<String>> {
        self.inner.description(resource)
    }

    fn property_set(&self, resource: &ResourceId) -> Result<Option<PropertySetId>> {
        self.inner.property_set(resource)
    }

    fn list_properties(&self, set: &PropertySetId) -> Result<Vec<Property>> {
        self.inner.list_properties(set)
    }

    fn set_property_value(&mut self, property: &PropertyId, value: &str) -> Result<()> {
        debug!("Dry run: would set {} to {}", property, value);
        self.discarded += 1;
        Ok(())
    }

    fn list_runtime_configs(&self, scope: &Scope) -> Result<Vec<RuntimeConfigId>> {
        self.inner.list_runtime_configs(scope)
    }

    fn argument_fields(&self, config: &RuntimeConfigId) -> Result<Vec<String>> {
        self.inner.argument_fields(config)
    }

    fn argument_string(&self, config: &RuntimeConfigId, field: &str) -> Result<String> {
        self.inner.argument_string(config, field)
    }

    fn set_argument_string(
        &mut self,
        config: &RuntimeConfigId,
        field: &str,
        value: &str,
    ) -> Result<()> {
        debug!("Dry run: would set {}.{} to \"{}\"", config, field, value);
        self.discarded += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        debug!("Dry run: discarding {} write(s)", self.discarded);
        Ok(())
    }
}
