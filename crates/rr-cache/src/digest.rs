//! Content fingerprints for change detection.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of an input file's content.
///
/// The fingerprint is the hex-encoded SHA-256 of the raw bytes (64 lowercase
/// hex characters). It only detects changes; nothing relies on it being
/// collision resistant.
#[must_use]
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    hex::encode(result)
}
