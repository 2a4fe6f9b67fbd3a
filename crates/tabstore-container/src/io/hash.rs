//! Payload hashing for integrity checks.

use sha2::{Digest, Sha256};

use crate::types::CHECKSUM_LEN;

/// Compute the SHA-256 digest of a payload.
pub fn compute_digest(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut digest = [0u8; CHECKSUM_LEN];
    digest.copy_from_slice(&hasher.finalize());
    digest
}
