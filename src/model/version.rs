//! Version lineage entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of an object's version history, newest first as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version_id: String,
    /// Parsed timestamp; the Unix epoch when the source value was unreadable
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub description: String,
}

impl VersionEntry {
    /// Create an entry with an epoch timestamp and empty author/description.
    pub fn new(version_id: impl Into<String>) -> Self {
        Self {
            version_id: version_id.into(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            author: String::new(),
            description: String::new(),
        }
    }
}

/// Linear membership test of a version id in a lineage.
#[must_use]
pub fn lineage_contains(version_id: &str, lineage: &[VersionEntry]) -> bool {
    lineage.iter().any(|entry| entry.version_id == version_id)
}
