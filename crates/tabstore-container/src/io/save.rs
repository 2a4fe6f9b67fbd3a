//! Container writing operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use super::hash::compute_digest;
use crate::error::{ContainerError, Result};
use crate::types::{CURRENT_SCHEMA_VERSION, ContainerFile, HEADER_LEN, MAGIC_BYTES};

/// Write a container file.
///
/// Uses atomic write (temp file + rename) so a crash mid-write never leaves
/// a truncated container behind.
pub fn write_container(file: &mut ContainerFile, path: &Path) -> Result<()> {
    file.touch();

    let bytes = serialize_container(file)?;

    let temp_path = path.with_extension("tbs.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ContainerError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut out = File::create(&temp_path).map_err(|e| ContainerError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    out.write_all(&bytes).map_err(|e| ContainerError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    out.sync_all().map_err(|e| ContainerError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;
    drop(out);

    fs::rename(&temp_path, path).map_err(|e| ContainerError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        entries = file.entries.len(),
        "Saved container to {}",
        path.display()
    );
    Ok(())
}

/// Serialize a container to bytes.
///
/// Format:
/// - 4 bytes: Magic ("TBS\x01")
/// - 4 bytes: Schema version (u32 little-endian)
/// - 32 bytes: SHA-256 of the payload
/// - N bytes: rkyv payload
fn serialize_container(file: &ContainerFile) -> Result<Vec<u8>> {
    let rkyv_bytes = rkyv::to_bytes::<rkyv::rancor::Error>(file).map_err(|e| {
        ContainerError::Serialization {
            source: Box::new(std::io::Error::other(format!(
                "rkyv serialization failed: {e}"
            ))),
        }
    })?;

    let mut output = Vec::with_capacity(HEADER_LEN + rkyv_bytes.len());
    output.extend_from_slice(&MAGIC_BYTES);
    output.extend_from_slice(&CURRENT_SCHEMA_VERSION.to_le_bytes());
    output.extend_from_slice(&compute_digest(&rkyv_bytes));
    output.extend_from_slice(&rkyv_bytes);

    Ok(output)
}
