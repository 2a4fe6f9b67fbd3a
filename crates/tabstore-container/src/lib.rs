//! Hierarchical binary container for named tables.
//!
//! A container is a single file holding path-addressable table slots. Each
//! slot stores one polars `DataFrame` or `Series` and carries a small
//! attribute bag of JSON-encoded values.
//!
//! # Features
//!
//! - **Path-addressed slots** with namespace prefixes (`runs/x/data`)
//! - **Atomic writes** to prevent data corruption
//! - **Integrity check** via a SHA-256 digest of the payload
//! - **Typed attributes** via serde
//!
//! # File Format
//!
//! ```text
//! +------------------+
//! | Magic: "TBS\x01" | 4 bytes - file identification
//! +------------------+
//! | Version: 1       | 4 bytes - u32 little-endian schema version
//! +------------------+
//! | SHA-256          | 32 bytes - digest of the payload
//! +------------------+
//! | rkyv Payload     | Variable - ContainerFile
//! +------------------+
//! ```
//!
//! # Example
//!
//! ```no_run
//! use polars::prelude::*;
//! use tabstore_container::{Container, EntryPath};
//!
//! let df = df!("id" => [1i64, 2, 3]).unwrap();
//! let key = EntryPath::parse("runs/x/data").unwrap();
//!
//! let mut container = Container::create("store.tbs");
//! container.put_table(&key, &df.into()).unwrap();
//! container.set_attr(&key, "type", "Basic").unwrap();
//! container.commit().unwrap();
//!
//! let container = Container::open("store.tbs").unwrap();
//! let tag: String = container.attr(&key, "type").unwrap();
//! assert_eq!(tag, "Basic");
//! ```

mod container;
mod error;
mod io;
mod table;
mod types;

pub use container::Container;
pub use error::{ContainerError, Result};
pub use io::{compute_digest, read_container, write_container};
pub use table::TableValue;
pub use types::{
    CHECKSUM_LEN, CURRENT_SCHEMA_VERSION, ContainerFile, Entry, EntryPath, HEADER_LEN,
    MAGIC_BYTES, TableKind,
};
