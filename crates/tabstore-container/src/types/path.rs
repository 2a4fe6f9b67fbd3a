//! Entry path normalization.

use std::fmt;

use crate::error::{ContainerError, Result};

/// Normalized `/`-separated address of a table slot.
///
/// Empty segments are dropped, so `""`, `"/"` and `"/x/"` all behave like
/// plain prefixes. `.` and `..` segments, and segments with leading or
/// trailing whitespace, are rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntryPath {
    segments: Vec<String>,
}

impl EntryPath {
    /// Parse a path, allowing it to be empty (a namespace root).
    pub fn namespace(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" => continue,
                padded if padded.trim() != padded => {
                    return Err(ContainerError::InvalidPath {
                        path: raw.to_string(),
                        reason: "segments must not start or end with whitespace",
                    });
                }
                "." | ".." => {
                    return Err(ContainerError::InvalidPath {
                        path: raw.to_string(),
                        reason: "relative segments are not allowed",
                    });
                }
                other => segments.push(other.to_string()),
            }
        }
        Ok(Self { segments })
    }

    /// Parse a path that must address a slot.
    pub fn parse(raw: &str) -> Result<Self> {
        let path = Self::namespace(raw)?;
        if path.is_root() {
            return Err(ContainerError::InvalidPath {
                path: raw.to_string(),
                reason: "path is empty",
            });
        }
        Ok(path)
    }

    /// Append a name (which may itself contain `/`).
    pub fn join(&self, name: &str) -> Result<Self> {
        let tail = Self::parse(name)?;
        let mut segments = self.segments.clone();
        segments.extend(tail.segments);
        Ok(Self { segments })
    }

    /// Whether this path has no segments.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Normalized string key used inside the container.
    pub fn key(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.key())
    }
}
