//! Tabular data stores that persist themselves to a container file.
//!
//! A [`TabularStore`] wraps one required primary table, the secondary tables
//! its variant declares, and a bag of properties. Saving writes each table
//! to its own container entry under an optional namespace and attaches the
//! properties plus a type tag to the primary entry. Loading checks the tag
//! against the loading variant before restoring anything.
//!
//! # Example
//!
//! ```no_run
//! use polars::prelude::*;
//! use tabstore_core::{SaveOptions, StoreKind, TabularStore};
//!
//! struct Photometry;
//!
//! impl StoreKind for Photometry {
//!     const TYPE_TAG: &'static str = "Photometry";
//!     const SECONDARY_TABLES: &'static [&'static str] = &["bands"];
//! }
//!
//! let data = df!("mag" => [17.2f64, 17.9]).unwrap();
//! let bands = Series::new("band".into(), &["g", "r"]);
//!
//! let store = TabularStore::<Photometry>::builder(data)
//!     .table("bands", bands)
//!     .property("instrument", "LSST")
//!     .build()
//!     .unwrap();
//! store
//!     .save("stars.tbs", &SaveOptions::new().with_namespace("field1"))
//!     .unwrap();
//!
//! let restored = TabularStore::<Photometry>::open("stars.tbs", "field1").unwrap();
//! assert_eq!(restored.property("instrument").and_then(|v| v.as_str()), Some("LSST"));
//! ```
//!
//! # Architecture
//!
//! - `kind.rs` - The [`StoreKind`] variant hook
//! - `store.rs` - [`TabularStore`], [`StoreBuilder`] and the save/load logic
//! - `metadata.rs` - The properties/type record on the primary entry
//! - `property.rs` - [`PropertyValue`]
//! - `options.rs` - [`SaveOptions`]
//! - `error.rs` - [`StoreError`]

mod error;
mod kind;
mod metadata;
mod options;
mod property;
mod store;

pub use error::{Result, StoreError};
pub use kind::{Basic, StoreKind};
pub use metadata::{PROPERTIES_ATTR, StoreMetadata, TYPE_ATTR};
pub use options::{ConflictPolicy, SaveOptions};
pub use property::PropertyValue;
pub use store::{StoreBuilder, TabularStore};

// Re-export the container types callers handle directly
pub use tabstore_container::{Container, ContainerError, EntryPath, TableKind, TableValue};
