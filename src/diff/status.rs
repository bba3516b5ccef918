//! Comparison status of one object across two versions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seven-state classification produced by the dual-layer comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeStatus {
    /// Present only in the new version
    New,
    /// Present only in the old version
    Removed,
    /// At least one side has no version identifier
    Unknown,
    /// Identical version identifiers
    NotChanged,
    /// Old version is an ancestor of the new one
    Changed,
    /// Versions diverged
    ConflictDetected,
    /// New version identifier, identical content
    #[serde(rename = "NOT_CHANGED_NEW_VUUID")]
    NotChangedNewVersionId,
}

impl ChangeStatus {
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::Removed,
        Self::Unknown,
        Self::NotChanged,
        Self::Changed,
        Self::ConflictDetected,
        Self::NotChangedNewVersionId,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Removed => "REMOVED",
            Self::Unknown => "UNKNOWN",
            Self::NotChanged => "NOT_CHANGED",
            Self::Changed => "CHANGED",
            Self::ConflictDetected => "CONFLICT_DETECTED",
            Self::NotChangedNewVersionId => "NOT_CHANGED_NEW_VUUID",
        }
    }

    /// Statuses counted as "modified" in category breakdowns.
    #[must_use]
    pub const fn is_modified(self) -> bool {
        matches!(
            self,
            Self::Changed | Self::ConflictDetected | Self::NotChangedNewVersionId
        )
    }

    /// Everything except `NotChanged` counts towards impact.
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::NotChanged)
    }

    /// Statuses eligible for content-hash refinement.
    #[must_use]
    pub const fn is_refinable(self) -> bool {
        matches!(self, Self::Changed | Self::ConflictDetected)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions() {
        let modified: Vec<_> = ChangeStatus::ALL.into_iter().filter(|s| s.is_modified()).collect();
        assert_eq!(
            modified,
            vec![
                ChangeStatus::Changed,
                ChangeStatus::ConflictDetected,
                ChangeStatus::NotChangedNewVersionId
            ]
        );
        assert_eq!(ChangeStatus::ALL.iter().filter(|s| s.is_change()).count(), 6);
    }

    #[test]
    fn test_serialized_name_matches_display() {
        let json = serde_json::to_string(&ChangeStatus::ConflictDetected).expect("serialize");
        assert_eq!(json, "\"CONFLICT_DETECTED\"");
        assert_eq!(ChangeStatus::NotChanged.to_string(), "NOT_CHANGED");
        for status in ChangeStatus::ALL {
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}
