//! Resource classification
//!
//! The Directory Service lists resource adapters only by their generic kind.
//! Which of them are the adapter being tuned is decided by a [`Classifier`];
//! the built-in one looks for an identifying tag in the free-text
//! description, since the service exposes nothing more precise.

use log::{debug, warn};

use crate::directory::{DirectoryService, ResourceId};
use crate::error::Result;
use crate::scope::Scope;

/// Decides whether a discovered resource is of the type being tuned.
pub trait Classifier {
    fn matches<D: DirectoryService + ?Sized>(
        &self,
        directory: &D,
        resource: &ResourceId,
    ) -> Result<bool>;
}

/// Matches resources whose description contains a fixed substring.
///
/// A resource without a description never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionTag {
    tag: String,
}

impl DescriptionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Test a description directly.
    pub fn matches_description(&self, description: Option<&str>) -> bool {
        description.is_some_and(|d| d.contains(&self.tag))
    }
}

impl Classifier for DescriptionTag {
    fn matches<D: DirectoryService + ?Sized>(
        &self,
        directory: &D,
        resource: &ResourceId,
    ) -> Result<bool> {
        let description = directory.description(resource)?;
        Ok(self.matches_description(description.as_deref()))
    }
}

/// List resources of `kind` in `scope` and keep those `classifier` accepts.
///
/// The relative order of the directory's listing is preserved. A resource
/// that cannot be inspected is logged and left out.
pub fn classify<D, C>(
    directory: &D,
    kind: &str,
    scope: &Scope,
    classifier: &C,
) -> Result<Vec<ResourceId>>
where
    D: DirectoryService + ?Sized,
    C: Classifier,
{
    let candidates = directory.list_resources(kind, scope)?;
    let total = candidates.len();

    let mut matched = Vec::new();
    for resource in candidates {
        match classifier.matches(directory, &resource) {
            Ok(true) => matched.push(resource),
            Ok(false) => debug!("Skipping {} {}: not the tuned adapter type", kind, resource),
            Err(e) if e.is_item_scoped() => warn!("Cannot classify {}: {}", resource, e),
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Classified {} of {} {} resource(s) in {}",
        matched.len(),
        total,
        kind,
        scope
    );
    Ok(matched)
}
