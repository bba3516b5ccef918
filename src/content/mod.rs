//! Content normalization and diff hashing.
//!
//! Hash equality is the sole criterion for "content identical" in the
//! comparator's second layer.

mod hash;
mod normalizer;

pub use hash::{DEFAULT_MAX_HASH_CHARS, DiffHash, DiffHasher, digest_hex};
pub use normalizer::normalize;
