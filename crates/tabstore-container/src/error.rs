//! Container error types.
//!
//! All container operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Container operation error.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Container file does not exist.
    #[error("Container file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid file format (not a container file).
    #[error("Invalid container file format: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Unsupported schema version.
    #[error("Container file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Payload digest does not match the header.
    #[error("Container payload checksum mismatch: {path}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Serialization error.
    #[error("Failed to serialize container data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize container data")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry path is empty or contains a relative segment.
    #[error("Invalid entry path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// No table slot at the given key.
    #[error("No entry '{key}' in {path}")]
    EntryNotFound { path: PathBuf, key: String },

    /// Slot exists but has no attribute with that name.
    #[error("Entry '{key}' has no attribute '{name}'")]
    AttributeNotFound {
        path: PathBuf,
        key: String,
        name: String,
    },

    /// Table payload could not be encoded or decoded.
    #[error("Failed to encode or decode table '{key}'")]
    Table {
        key: String,
        #[source]
        source: PolarsError,
    },

    /// Attribute value could not be encoded or decoded.
    #[error("Failed to encode or decode attribute '{name}' of entry '{key}'")]
    Attribute {
        key: String,
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ContainerError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("The container file {} does not exist.", path.display())
            }
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { path, reason } => {
                format!(
                    "The file at {} is not a valid container file: {}",
                    path.display(),
                    reason
                )
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This container was written by a newer version of tabstore \
                    (file version {}, this version supports up to {}).",
                    found, max_supported
                )
            }
            Self::ChecksumMismatch { path, .. } => {
                format!(
                    "The container file {} failed its integrity check.",
                    path.display()
                )
            }
            Self::Serialization { .. } => {
                "An error occurred while writing the container data.".to_string()
            }
            Self::Deserialization { .. } => {
                "An error occurred while reading the container data. The file may be corrupted."
                    .to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::InvalidPath { path, reason } => {
                format!("'{}' is not a usable entry path: {}", path, reason)
            }
            Self::EntryNotFound { path, key } => {
                format!("The container {} has no entry '{}'.", path.display(), key)
            }
            Self::AttributeNotFound { key, name, .. } => {
                format!("The entry '{}' carries no '{}' attribute.", key, name)
            }
            Self::Table { key, .. } => format!("The table stored at '{}' is unreadable.", key),
            Self::Attribute { key, name, .. } => {
                format!("The '{}' attribute of '{}' is unreadable.", name, key)
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::FileNotFound { .. } => Some("Check the path of the container file.".into()),
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Make sure the file was written by tabstore.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Upgrade tabstore to read this file.".into()),
            Self::ChecksumMismatch { .. } | Self::Deserialization { .. } => {
                Some("Try opening a backup if you have one.".into())
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
            Self::EntryNotFound { .. } => {
                Some("Check that the namespace matches the one used when saving.".into())
            }
            Self::InvalidPath { .. } => {
                Some("Use '/'-separated names without '.' or '..' segments.".into())
            }
            Self::Serialization { .. }
            | Self::AttributeNotFound { .. }
            | Self::Table { .. }
            | Self::Attribute { .. } => None,
        }
    }
}

/// Result type alias for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContainerError::EntryNotFound {
            path: PathBuf::from("store.tbs"),
            key: "x/data".to_string(),
        };
        assert_eq!(format!("{err}"), "No entry 'x/data' in store.tbs");
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_user_message_mentions_versions() {
        let err = ContainerError::UnsupportedVersion {
            found: 9,
            max_supported: 1,
            path: PathBuf::from("store.tbs"),
        };
        let message = err.user_message();
        assert!(message.contains("file version 9"));
        assert!(message.contains("up to 1"));
    }
}
