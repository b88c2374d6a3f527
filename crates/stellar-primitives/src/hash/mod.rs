//! Hash function primitives for the Stellar SDK.
//!
//! Stellar uses plain SHA-256 everywhere: network ids are the SHA-256 of the
//! network passphrase, and transaction hashes are the SHA-256 of the
//! signature payload.

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
