//! Diff hash: content-identity fingerprint over normalized text.

use super::normalize;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// Default cap on raw document size, in characters.
pub const DEFAULT_MAX_HASH_CHARS: usize = 500_000;

/// Outcome of diff hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "digest", rename_all = "snake_case")]
pub enum DiffHash {
    /// Hex-encoded SHA-512 of the normalized document
    Digest(String),
    /// Document exceeded the size cap and was not hashed
    Unavailable,
}

impl DiffHash {
    #[must_use]
    pub fn digest(&self) -> Option<&str> {
        match self {
            Self::Digest(d) => Some(d),
            Self::Unavailable => None,
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Digest(_))
    }
}

/// Computes diff hashes under a size cap.
#[derive(Debug, Clone, Copy)]
pub struct DiffHasher {
    max_chars: usize,
}

impl Default for DiffHasher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HASH_CHARS)
    }
}

impl DiffHasher {
    #[must_use]
    pub const fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    #[must_use]
    pub const fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Hash a raw document, or report it unavailable when over the cap.
    #[must_use]
    pub fn hash(&self, raw: &str) -> DiffHash {
        // Byte length bounds the char count from above, so skip the scan
        // for documents that are clearly within the cap.
        if raw.len() > self.max_chars && raw.chars().count() > self.max_chars {
            tracing::debug!(
                chars = raw.chars().count(),
                cap = self.max_chars,
                "document over hash cap, diff hash unavailable"
            );
            return DiffHash::Unavailable;
        }
        DiffHash::Digest(digest_hex(&normalize(raw)))
    }
}

/// Hex SHA-512 of already-normalized text.
#[must_use]
pub fn digest_hex(normalized: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}
