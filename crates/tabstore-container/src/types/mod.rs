//! Container types.
//!
//! The file-level types are rkyv-serializable; `EntryPath` addresses slots
//! inside a container.

mod entry;
mod path;

pub use entry::{ContainerFile, Entry, TableKind};
pub use path::EntryPath;

/// Current schema version.
///
/// Increment this when making breaking changes to the container format.
/// The loader will reject files with version > CURRENT_SCHEMA_VERSION.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Magic bytes at the start of container files.
///
/// Format: "TBS" + version byte (0x01 for v1)
pub const MAGIC_BYTES: [u8; 4] = [b'T', b'B', b'S', 0x01];

/// Length of the SHA-256 payload digest stored after the version.
pub const CHECKSUM_LEN: usize = 32;

/// Total header length: magic, version, digest.
pub const HEADER_LEN: usize = MAGIC_BYTES.len() + 4 + CHECKSUM_LEN;
