//! File I/O operations for container persistence.
//!
//! This module handles:
//! - Writing containers with atomic writes
//! - Reading containers with format and integrity validation
//! - Payload hashing

mod hash;
mod load;
mod save;

pub use hash::compute_digest;
pub use load::read_container;
pub use save::write_container;
