//! One-way password digests.
//!
//! Passwords are never stored in plaintext. The login flow compares
//! digests by equality, so the digest must be deterministic: the same
//! plaintext always produces the same hex string.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of `plaintext`.
pub fn sha256_hex(plaintext: &str) -> String {
    let digest = Sha256::digest(plaintext.as_bytes());
    hex::encode(digest)
}
