//! Stable fingerprints for prompt text.
//!
//! Prompts can carry user data, so logs record a short SHA-256 digest
//! instead of the text itself.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
const FINGERPRINT_LEN: usize = 16;

/// Returns a short hex fingerprint of `text`.
#[must_use]
pub fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}
