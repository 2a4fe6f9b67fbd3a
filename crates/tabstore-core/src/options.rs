//! Save options.

use std::collections::BTreeMap;

use crate::property::PropertyValue;

/// How to handle an existing destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Fail if the destination exists.
    #[default]
    Fail,
    /// Delete the destination first.
    Overwrite,
    /// Add entries to the existing container.
    Append,
}

/// Options for [`TabularStore::save`](crate::TabularStore::save).
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Path-like prefix under which this store's entries are written.
    pub namespace: String,

    /// Extra or overriding properties for the saved metadata record.
    pub properties: BTreeMap<String, PropertyValue>,

    /// Delete an existing destination before writing (takes precedence over `append`).
    pub overwrite: bool,

    /// Write into an existing destination instead of failing.
    pub append: bool,
}

impl SaveOptions {
    /// Create save options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store entries under `namespace`.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Add or override one saved property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add or override several saved properties.
    #[must_use]
    pub fn with_properties(mut self, properties: BTreeMap<String, PropertyValue>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Replace an existing destination.
    #[must_use]
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Add to an existing destination.
    #[must_use]
    pub fn append(mut self) -> Self {
        self.append = true;
        self
    }

    /// Effective policy for an existing destination.
    pub fn conflict_policy(&self) -> ConflictPolicy {
        if self.overwrite {
            ConflictPolicy::Overwrite
        } else if self.append {
            ConflictPolicy::Append
        } else {
            ConflictPolicy::Fail
        }
    }
}
