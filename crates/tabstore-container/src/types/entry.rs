//! Root container file and table slot types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rkyv::{Archive, Deserialize, Serialize};

/// Root container structure.
///
/// This is the top-level type that gets serialized after the file header.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct ContainerFile {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// When the container was created.
    pub created_at: String,

    /// When the container was last written.
    pub last_saved_at: String,

    /// Table slots keyed by normalized entry path.
    pub entries: BTreeMap<String, Entry>,
}

impl ContainerFile {
    /// Create an empty container file.
    pub fn new() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            schema_version: super::CURRENT_SCHEMA_VERSION,
            created_at: now.clone(),
            last_saved_at: now,
            entries: BTreeMap::new(),
        }
    }

    /// Update the last saved timestamp.
    pub fn touch(&mut self) {
        self.last_saved_at = Utc::now().to_rfc3339();
    }

    /// Parse the created_at timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Parse the last_saved_at timestamp.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.last_saved_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Default for ContainerFile {
    fn default() -> Self {
        Self::new()
    }
}

/// One named table slot.
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct Entry {
    /// Shape of the stored table.
    pub kind: TableKind,

    /// Row count at write time; IPC carries no rows for a frame without columns.
    pub height: u64,

    /// Arrow IPC encoding of the table.
    pub payload: Vec<u8>,

    /// Attribute bag (name -> JSON-encoded value).
    pub attrs: BTreeMap<String, String>,
}

impl Entry {
    /// Create a slot with an empty attribute bag.
    pub fn new(kind: TableKind, height: u64, payload: Vec<u8>) -> Self {
        Self {
            kind,
            height,
            payload,
            attrs: BTreeMap::new(),
        }
    }
}

/// Shape of a stored table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub enum TableKind {
    /// Rows by named columns.
    Frame,
    /// A single named sequence.
    Series,
}
