//! Container loading operations.

use std::fs;
use std::path::Path;

use rkyv::util::AlignedVec;

use super::hash::compute_digest;
use crate::error::{ContainerError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, ContainerFile, HEADER_LEN, MAGIC_BYTES};

/// Read a container file.
pub fn read_container(path: &Path) -> Result<ContainerFile> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ContainerError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ContainerError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    parse_container_bytes(&bytes, path)
}

/// Parse container bytes and validate the format.
fn parse_container_bytes(bytes: &[u8], path: &Path) -> Result<ContainerFile> {
    if bytes.len() < HEADER_LEN {
        return Err(ContainerError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "File too small".to_string(),
        });
    }

    if bytes[0..4] != MAGIC_BYTES {
        return Err(ContainerError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "Not a tabstore container (invalid magic bytes)".to_string(),
        });
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    if version > CURRENT_SCHEMA_VERSION {
        return Err(ContainerError::UnsupportedVersion {
            found: version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let stored_digest = &bytes[8..HEADER_LEN];
    let payload = &bytes[HEADER_LEN..];

    let actual_digest = compute_digest(payload);
    if stored_digest != actual_digest.as_slice() {
        return Err(ContainerError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: hex::encode(stored_digest),
            actual: hex::encode(actual_digest),
        });
    }

    // rkyv validates alignment, so copy the payload out of the header offset.
    let mut aligned = AlignedVec::<16>::with_capacity(payload.len());
    aligned.extend_from_slice(payload);

    let file = rkyv::from_bytes::<ContainerFile, rkyv::rancor::Error>(&aligned).map_err(|e| {
        ContainerError::Deserialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv deserialization failed: {e}"
            ))),
        }
    })?;

    tracing::debug!(
        entries = file.entries.len(),
        "Read container from {}",
        path.display()
    );
    Ok(file)
}
