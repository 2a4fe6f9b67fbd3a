//! Metadata record attached to the primary table's entry.

use std::collections::BTreeMap;

use tabstore_container::{Container, EntryPath};

use crate::error::Result;
use crate::property::PropertyValue;

/// Attribute holding the property mapping.
pub const PROPERTIES_ATTR: &str = "properties";

/// Attribute holding the variant's type tag.
pub const TYPE_ATTR: &str = "type";

/// Properties and type tag saved alongside the primary table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreMetadata {
    pub properties: BTreeMap<String, PropertyValue>,
    pub type_tag: String,
}

impl StoreMetadata {
    /// Attach this record to the entry at `key`.
    pub fn write(&self, container: &mut Container, key: &EntryPath) -> Result<()> {
        container.set_attr(key, PROPERTIES_ATTR, &self.properties)?;
        container.set_attr(key, TYPE_ATTR, self.type_tag.as_str())?;
        Ok(())
    }

    /// Read only the type tag from the entry at `key`.
    pub fn read_type_tag(container: &Container, key: &EntryPath) -> Result<String> {
        Ok(container.attr(key, TYPE_ATTR)?)
    }

    /// Read the record from the entry at `key`.
    pub fn read(container: &Container, key: &EntryPath) -> Result<Self> {
        Ok(Self {
            type_tag: Self::read_type_tag(container, key)?,
            properties: container.attr(key, PROPERTIES_ATTR)?,
        })
    }
}
