//! Store error types.

use std::path::PathBuf;

use tabstore_container::ContainerError;
use thiserror::Error;

/// Errors raised while building, saving or loading a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Declared secondary tables were not supplied at construction.
    #[error("missing required table(s): {}", .names.join(", "))]
    MissingTables { names: Vec<String> },

    /// A table was supplied that the variant does not declare.
    #[error("table '{name}' is not declared by {type_tag}")]
    UndeclaredTable {
        name: String,
        type_tag: &'static str,
    },

    /// A property uses the name of a table slot, or two table slots resolve
    /// to the same container entry.
    #[error("'{name}' conflicts with another table slot of the same name")]
    NameConflict { name: String },

    /// Destination exists and neither overwrite nor append was requested.
    #[error("{path} already exists; set either overwrite or append")]
    AlreadyExists { path: PathBuf },

    /// Append would replace an entry that is already in the container.
    #[error("entry '{entry}' already exists in {path}")]
    EntryExists { path: PathBuf, entry: String },

    /// The stored type tag differs from the loading variant.
    #[error("saved store is {stored}; instantiate that type before loading (not {expected})")]
    TypeMismatch {
        stored: String,
        expected: &'static str,
    },

    /// A required container entry, attribute or the file itself is absent.
    #[error("'{entry}' not found in {path}")]
    NotFound { path: PathBuf, entry: String },

    /// The store has no primary table to save.
    #[error("store has no primary table; construct or load it first")]
    Unpopulated,

    /// A float property is NaN or infinite and cannot be stored.
    #[error("property '{name}' holds a non-finite float")]
    NonFiniteProperty { name: String },

    /// File system error outside the container itself.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other container failure.
    #[error(transparent)]
    Container(ContainerError),
}

impl StoreError {
    /// Whether this error reports something absent (file, entry or attribute).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingTables { names } => {
                Some(format!("Supply the table(s) {} when building.", names.join(", ")))
            }
            Self::AlreadyExists { .. } => {
                Some("Pass overwrite to replace the file or append to add to it.".into())
            }
            Self::EntryExists { .. } => {
                Some("Save under a different namespace or remove the entry first.".into())
            }
            Self::TypeMismatch { stored, .. } => {
                Some(format!("Load the file into a {stored} store instead."))
            }
            Self::NotFound { .. } => {
                Some("Check the file path and that the namespace matches the saved one.".into())
            }
            Self::NonFiniteProperty { .. } => {
                Some("Replace NaN or infinite values with Null before saving.".into())
            }
            Self::Container(err) => err.suggestion(),
            Self::UndeclaredTable { .. }
            | Self::NameConflict { .. }
            | Self::Unpopulated
            | Self::Io { .. } => None,
        }
    }
}

impl From<ContainerError> for StoreError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::FileNotFound { path } => Self::NotFound {
                path,
                entry: "/".to_string(),
            },
            ContainerError::EntryNotFound { path, key } => Self::NotFound { path, entry: key },
            ContainerError::AttributeNotFound { path, key, name } => Self::NotFound {
                path,
                entry: format!("{key}@{name}"),
            },
            other => Self::Container(other),
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
