//! Comparison result structures.

use super::ChangeStatus;
use crate::model::AppObject;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Version bookkeeping captured at classification time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub old_version_id: Option<String>,
    pub new_version_id: Option<String>,
    pub old_lineage_len: usize,
    pub new_lineage_len: usize,
    /// Whether the old version id appears in the new lineage
    pub old_in_new_lineage: bool,
}

impl VersionInfo {
    pub(crate) fn capture(old: Option<&AppObject>, new: Option<&AppObject>) -> Self {
        let old_version_id = old.and_then(AppObject::version_id).map(str::to_string);
        let old_in_new_lineage = match (old_version_id.as_deref(), new) {
            (Some(id), Some(new)) => {
                crate::model::lineage_contains(id, &new.core().version_lineage)
            }
            _ => false,
        };
        Self {
            new_version_id: new.and_then(AppObject::version_id).map(str::to_string),
            old_lineage_len: old.map_or(0, |o| o.core().version_lineage.len()),
            new_lineage_len: new.map_or(0, |o| o.core().version_lineage.len()),
            old_version_id,
            old_in_new_lineage,
        }
    }
}

/// One field-level difference, phrased for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDelta {
    pub field: String,
    pub summary: String,
}

/// Field-level deltas between two versions of an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDiff {
    pub deltas: Vec<FieldDelta>,
}

impl ContentDiff {
    pub(crate) fn push(&mut self, field: impl Into<String>, summary: impl Into<String>) {
        self.deltas.push(FieldDelta {
            field: field.into(),
            summary: summary.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// All deltas on one line.
    #[must_use]
    pub fn summary(&self) -> String {
        self.deltas
            .iter()
            .map(|d| d.summary.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Outcome of comparing one object across two versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub status: ChangeStatus,
    /// New-side object, or the old one when removed
    pub object: Arc<AppObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_object: Option<Arc<AppObject>>,
    pub version_info: VersionInfo,
    #[serde(default, skip_serializing_if = "ContentDiff::is_empty")]
    pub content_diff: ContentDiff,
    /// Classification decisions in the order they were made
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl ComparisonResult {
    #[must_use]
    pub fn uuid(&self) -> &str {
        self.object.uuid()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.object.name()
    }

    /// The new-side object, if the object exists in the new version.
    #[must_use]
    pub fn new_object(&self) -> Option<&AppObject> {
        match self.status {
            ChangeStatus::Removed => None,
            _ => Some(&self.object),
        }
    }
}
