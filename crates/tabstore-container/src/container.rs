//! Open container handle.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ContainerError, Result};
use crate::io::{read_container, write_container};
use crate::table::{TableValue, decode_entry, encode_entry};
use crate::types::{ContainerFile, Entry, EntryPath};

/// A container file opened for reading or writing.
///
/// Changes are held in memory until [`Container::commit`], which writes the
/// whole file atomically and releases the handle. Dropping an uncommitted
/// handle leaves the file on disk as it was.
#[derive(Debug)]
pub struct Container {
    path: PathBuf,
    file: ContainerFile,
}

impl Container {
    /// Start a new, empty container at `path`. Nothing is written until commit.
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: ContainerFile::new(),
        }
    }

    /// Open an existing container.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = read_container(&path)?;
        Ok(Self { path, file })
    }

    /// Location of the container file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header record of the underlying file.
    pub fn file(&self) -> &ContainerFile {
        &self.file
    }

    /// Normalized keys of every slot, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.file.entries.keys().map(String::as_str)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    /// Whether the container has no slots.
    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    /// Whether a slot exists at `key`.
    pub fn contains(&self, key: &EntryPath) -> bool {
        self.file.entries.contains_key(&key.key())
    }

    /// Store a table, replacing any previous table and attributes at `key`.
    pub fn put_table(&mut self, key: &EntryPath, table: &TableValue) -> Result<()> {
        let key = key.key();
        let entry = encode_entry(&key, table)?;
        tracing::debug!(
            key = %key,
            rows = table.len(),
            bytes = entry.payload.len(),
            "Wrote table"
        );
        self.file.entries.insert(key, entry);
        Ok(())
    }

    /// Read the table at `key`.
    pub fn table(&self, key: &EntryPath) -> Result<TableValue> {
        let key = key.key();
        let table = decode_entry(&key, self.entry(&key)?)?;
        tracing::debug!(key = %key, rows = table.len(), "Read table");
        Ok(table)
    }

    /// Remove the slot at `key`, returning whether it existed.
    pub fn remove(&mut self, key: &EntryPath) -> bool {
        self.file.entries.remove(&key.key()).is_some()
    }

    /// Attach an attribute to the slot at `key`.
    pub fn set_attr<T>(&mut self, key: &EntryPath, name: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = key.key();
        let encoded = serde_json::to_string(value).map_err(|source| ContainerError::Attribute {
            key: key.clone(),
            name: name.to_string(),
            source,
        })?;
        let entry = self.entry_mut(&key)?;
        entry.attrs.insert(name.to_string(), encoded);
        Ok(())
    }

    /// Read an attribute of the slot at `key`.
    pub fn attr<T: DeserializeOwned>(&self, key: &EntryPath, name: &str) -> Result<T> {
        let key = key.key();
        let raw = self
            .entry(&key)?
            .attrs
            .get(name)
            .ok_or_else(|| ContainerError::AttributeNotFound {
                path: self.path.clone(),
                key: key.clone(),
                name: name.to_string(),
            })?;
        serde_json::from_str(raw).map_err(|source| ContainerError::Attribute {
            key,
            name: name.to_string(),
            source,
        })
    }

    /// Names of the attributes attached to the slot at `key`.
    pub fn attr_names(&self, key: &EntryPath) -> Result<Vec<String>> {
        Ok(self.entry(&key.key())?.attrs.keys().cloned().collect())
    }

    /// Raw attribute bag of the slot at `key`.
    pub fn attrs(&self, key: &EntryPath) -> Result<&BTreeMap<String, String>> {
        Ok(&self.entry(&key.key())?.attrs)
    }

    /// Write the container to disk and release the handle.
    pub fn commit(mut self) -> Result<()> {
        write_container(&mut self.file, &self.path)
    }

    fn entry(&self, key: &str) -> Result<&Entry> {
        self.file
            .entries
            .get(key)
            .ok_or_else(|| ContainerError::EntryNotFound {
                path: self.path.clone(),
                key: key.to_string(),
            })
    }

    fn entry_mut(&mut self, key: &str) -> Result<&mut Entry> {
        let path = &self.path;
        self.file
            .entries
            .get_mut(key)
            .ok_or_else(|| ContainerError::EntryNotFound {
                path: path.clone(),
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use tempfile::tempdir;

    fn key(raw: &str) -> EntryPath {
        EntryPath::parse(raw).unwrap()
    }

    #[test]
    fn test_put_replaces_attributes() {
        let mut container = Container::create("unused.tbs");
        let series = Series::new("v".into(), &[1i64, 2]);

        container.put_table(&key("a"), &series.clone().into()).unwrap();
        container.set_attr(&key("a"), "type", "Basic").unwrap();
        assert_eq!(container.attr_names(&key("a")).unwrap(), vec!["type"]);

        container.put_table(&key("a"), &series.into()).unwrap();
        assert!(container.attr_names(&key("a")).unwrap().is_empty());
    }

    #[test]
    fn test_attr_lookup_errors() {
        let mut container = Container::create("unused.tbs");
        assert!(matches!(
            container.set_attr(&key("missing"), "type", "Basic"),
            Err(ContainerError::EntryNotFound { .. })
        ));

        let df = df!("x" => [1i32]).unwrap();
        container.put_table(&key("a"), &df.into()).unwrap();
        let result: Result<String> = container.attr(&key("a"), "type");
        assert!(matches!(
            result,
            Err(ContainerError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_uncommitted_handle_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.tbs");

        let mut container = Container::create(&path);
        let df = df!("x" => [1i32]).unwrap();
        container.put_table(&key("a"), &df.into()).unwrap();
        drop(container);

        assert!(!path.exists());
    }

    #[test]
    fn test_commit_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.tbs");

        let mut container = Container::create(&path);
        let df = df!("x" => [1i32, 2], "y" => ["a", "b"]).unwrap();
        container.put_table(&key("x/data"), &df.clone().into()).unwrap();
        container
            .set_attr(&key("x/data"), "tags", &vec!["one", "two"])
            .unwrap();
        container.commit().unwrap();

        let mut reopened = Container::open(&path).unwrap();
        assert_eq!(reopened.keys().collect::<Vec<_>>(), vec!["x/data"]);
        let tags: Vec<String> = reopened.attr(&key("/x/data/"), "tags").unwrap();
        assert_eq!(tags, vec!["one", "two"]);
        let table = reopened.table(&key("x/data")).unwrap();
        assert!(table.as_frame().unwrap().equals_missing(&df));

        assert!(reopened.remove(&key("x/data")));
        assert!(!reopened.remove(&key("x/data")));
        assert!(reopened.is_empty());
    }
}
