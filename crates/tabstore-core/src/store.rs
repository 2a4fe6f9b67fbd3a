//! The tabular store and its save/load round trip.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use tabstore_container::{Container, EntryPath, TableValue};

use crate::error::{Result, StoreError};
use crate::kind::{Basic, StoreKind};
use crate::metadata::StoreMetadata;
use crate::options::{ConflictPolicy, SaveOptions};
use crate::property::PropertyValue;

/// A primary table, the secondary tables its variant declares, and a bag of
/// properties, persisted together in one container file.
///
/// A store is either built in memory with [`TabularStore::builder`] or
/// restored with [`TabularStore::open`] / [`TabularStore::load`].
pub struct TabularStore<K: StoreKind = Basic> {
    primary: Option<TableValue>,
    secondary: BTreeMap<String, TableValue>,
    properties: BTreeMap<String, PropertyValue>,
    kind: PhantomData<fn() -> K>,
}

impl<K: StoreKind> TabularStore<K> {
    /// An unpopulated shell, ready for [`TabularStore::load`].
    pub fn empty() -> Self {
        Self {
            primary: None,
            secondary: BTreeMap::new(),
            properties: BTreeMap::new(),
            kind: PhantomData,
        }
    }

    /// Start building a store around its primary table.
    pub fn builder(primary: impl Into<TableValue>) -> StoreBuilder<K> {
        StoreBuilder::new(primary)
    }

    /// Load a store saved under `namespace` in the container at `path`.
    pub fn open(path: impl AsRef<Path>, namespace: &str) -> Result<Self> {
        let mut store = Self::empty();
        store.load(path, namespace)?;
        Ok(store)
    }

    /// Stored type tag of this variant.
    pub fn type_tag(&self) -> &'static str {
        K::TYPE_TAG
    }

    /// Slot name of the primary table.
    pub fn primary_table_name(&self) -> &'static str {
        K::PRIMARY_TABLE
    }

    /// Secondary tables this variant requires.
    pub fn secondary_table_names(&self) -> &'static [&'static str] {
        K::SECONDARY_TABLES
    }

    /// Whether the primary table is present.
    pub fn is_populated(&self) -> bool {
        self.primary.is_some()
    }

    pub fn primary_table(&self) -> Option<&TableValue> {
        self.primary.as_ref()
    }

    /// Look up a table by slot name, primary or secondary.
    pub fn table(&self, name: &str) -> Option<&TableValue> {
        if name == K::PRIMARY_TABLE {
            self.primary.as_ref()
        } else {
            self.secondary.get(name)
        }
    }

    /// Replace the primary table.
    pub fn set_primary_table(&mut self, table: impl Into<TableValue>) {
        self.primary = Some(table.into());
    }

    /// Replace a declared secondary table.
    pub fn set_table(&mut self, name: &str, table: impl Into<TableValue>) -> Result<()> {
        if !K::declares(name) {
            return Err(StoreError::UndeclaredTable {
                name: name.to_string(),
                type_tag: K::TYPE_TAG,
            });
        }
        self.secondary.insert(name.to_string(), table.into());
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// All tracked properties.
    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    /// Set (and track) a property.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        let name = name.into();
        check_property_name::<K>(&name)?;
        self.properties.insert(name, value.into());
        Ok(())
    }

    /// Save into the container at `path`.
    ///
    /// The primary table goes to `<namespace>/<primary>` with the metadata
    /// record attached; each secondary table goes to `<namespace>/<name>`.
    /// An existing file is an error unless `overwrite` (delete first) or
    /// `append` is set. Appending never replaces an existing entry.
    pub fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        let path = path.as_ref();
        let primary = self.primary.as_ref().ok_or(StoreError::Unpopulated)?;

        let metadata = StoreMetadata {
            properties: self.saved_properties(options)?,
            type_tag: K::TYPE_TAG.to_string(),
        };

        let tables = self.entries_to_write(primary, &options.namespace)?;

        let mut container = match (path.exists(), options.conflict_policy()) {
            (false, _) => Container::create(path),
            (true, ConflictPolicy::Fail) => {
                return Err(StoreError::AlreadyExists {
                    path: path.to_path_buf(),
                });
            }
            (true, ConflictPolicy::Overwrite) => {
                tracing::warn!("Overwriting existing container {}", path.display());
                fs::remove_file(path).map_err(|e| StoreError::Io {
                    operation: "remove",
                    path: path.to_path_buf(),
                    source: e,
                })?;
                Container::create(path)
            }
            (true, ConflictPolicy::Append) => {
                let container = Container::open(path)?;
                if let Some((key, _)) = tables.iter().find(|(key, _)| container.contains(key)) {
                    return Err(StoreError::EntryExists {
                        path: path.to_path_buf(),
                        entry: key.key(),
                    });
                }
                container
            }
        };

        let (primary_key, _) = &tables[0];
        for (idx, (key, table)) in tables.iter().enumerate() {
            container.put_table(key, table)?;
            if idx == 0 {
                metadata.write(&mut container, primary_key)?;
            }
        }
        container.commit()?;

        tracing::info!(
            type_tag = K::TYPE_TAG,
            namespace = %options.namespace,
            tables = tables.len(),
            properties = metadata.properties.len(),
            "Saved store to {}",
            path.display()
        );
        Ok(())
    }

    /// Restore this store from the container at `path`.
    ///
    /// The stored type tag is checked before anything is restored. A failure
    /// after that point may leave the store partially populated.
    pub fn load(&mut self, path: impl AsRef<Path>, namespace: &str) -> Result<&mut Self> {
        let path = path.as_ref();
        let container = Container::open(path)?;
        let ns = EntryPath::namespace(namespace)?;
        let primary_key = ns.join(K::PRIMARY_TABLE)?;

        let stored = StoreMetadata::read_type_tag(&container, &primary_key)?;
        if stored != K::TYPE_TAG {
            return Err(StoreError::TypeMismatch {
                stored,
                expected: K::TYPE_TAG,
            });
        }

        let metadata = StoreMetadata::read(&container, &primary_key)?;
        self.properties.extend(metadata.properties);

        self.primary = Some(container.table(&primary_key)?);

        for name in K::SECONDARY_TABLES {
            let table = container.table(&ns.join(name)?)?;
            self.secondary.insert((*name).to_string(), table);
        }

        tracing::info!(
            type_tag = K::TYPE_TAG,
            namespace = %namespace,
            properties = self.properties.len(),
            "Loaded store from {}",
            path.display()
        );
        Ok(self)
    }

    /// Tracked properties with the explicit overrides applied.
    fn saved_properties(&self, options: &SaveOptions) -> Result<BTreeMap<String, PropertyValue>> {
        let mut properties = self.properties.clone();
        properties.extend(options.properties.clone());

        if let Some((name, _)) = properties.iter().find(|(_, value)| !value.is_finite()) {
            return Err(StoreError::NonFiniteProperty { name: name.clone() });
        }
        Ok(properties)
    }

    /// Keys and tables to write, primary first.
    fn entries_to_write<'a>(
        &'a self,
        primary: &'a TableValue,
        namespace: &str,
    ) -> Result<Vec<(EntryPath, &'a TableValue)>> {
        check_table_layout::<K>()?;
        let ns = EntryPath::namespace(namespace)?;
        let mut tables = vec![(ns.join(K::PRIMARY_TABLE)?, primary)];

        let mut missing = Vec::new();
        for name in K::SECONDARY_TABLES {
            match self.secondary.get(*name) {
                Some(table) => tables.push((ns.join(name)?, table)),
                None => missing.push((*name).to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(StoreError::MissingTables { names: missing });
        }
        Ok(tables)
    }
}

impl<K: StoreKind> Default for TabularStore<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: StoreKind> Clone for TabularStore<K> {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
            properties: self.properties.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: StoreKind> fmt::Debug for TabularStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabularStore")
            .field("type_tag", &K::TYPE_TAG)
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .field("properties", &self.properties)
            .finish()
    }
}

/// In-memory construction of a [`TabularStore`].
pub struct StoreBuilder<K: StoreKind = Basic> {
    primary: TableValue,
    tables: Vec<(String, TableValue)>,
    properties: Vec<(String, PropertyValue)>,
    kind: PhantomData<fn() -> K>,
}

impl<K: StoreKind> StoreBuilder<K> {
    pub fn new(primary: impl Into<TableValue>) -> Self {
        Self {
            primary: primary.into(),
            tables: Vec::new(),
            properties: Vec::new(),
            kind: PhantomData,
        }
    }

    /// Add a property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Add several properties.
    #[must_use]
    pub fn properties<I, N, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<PropertyValue>,
    {
        self.properties
            .extend(properties.into_iter().map(|(n, v)| (n.into(), v.into())));
        self
    }

    /// Supply a secondary table.
    #[must_use]
    pub fn table(mut self, name: impl Into<String>, table: impl Into<TableValue>) -> Self {
        self.tables.push((name.into(), table.into()));
        self
    }

    /// Validate and build the store.
    ///
    /// Every declared secondary table must have been supplied; all missing
    /// names are reported together.
    pub fn build(self) -> Result<TabularStore<K>> {
        check_table_layout::<K>()?;
        let mut store = TabularStore::<K>::empty();
        store.primary = Some(self.primary);

        for (name, value) in self.properties {
            store.set_property(name, value)?;
        }
        for (name, table) in self.tables {
            store.set_table(&name, table)?;
        }

        let missing: Vec<String> = K::SECONDARY_TABLES
            .iter()
            .filter(|name| !store.secondary.contains_key(**name))
            .map(|name| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::MissingTables { names: missing });
        }

        tracing::debug!(
            type_tag = K::TYPE_TAG,
            tables = store.secondary.len() + 1,
            properties = store.properties.len(),
            "Built store"
        );
        Ok(store)
    }
}

fn check_property_name<K: StoreKind>(name: &str) -> Result<()> {
    if name == K::PRIMARY_TABLE || K::declares(name) {
        return Err(StoreError::NameConflict {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Every table slot of `K` must resolve to its own container entry.
fn check_table_layout<K: StoreKind>() -> Result<()> {
    let mut keys = BTreeSet::from([EntryPath::parse(K::PRIMARY_TABLE)?]);
    for name in K::SECONDARY_TABLES {
        if !keys.insert(EntryPath::parse(name)?) {
            return Err(StoreError::NameConflict {
                name: (*name).to_string(),
            });
        }
    }
    Ok(())
}
