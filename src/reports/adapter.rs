//! Output adapter: maps a [`ComparisonReport`] onto the external report
//! schema consumed by downstream tooling.

use crate::diff::{CategoryCounts, ChangeStatus, ComparisonReport, ComparisonResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Change type in the external schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExternalChangeType {
    #[serde(rename = "ADDED")]
    Added,
    #[serde(rename = "MODIFIED")]
    Modified,
    #[serde(rename = "REMOVED")]
    Removed,
}

impl ExternalChangeType {
    /// External change type for a status. `NotChanged` is not reported.
    #[must_use]
    pub const fn for_status(status: ChangeStatus) -> Option<Self> {
        match status {
            ChangeStatus::New => Some(Self::Added),
            ChangeStatus::Removed => Some(Self::Removed),
            ChangeStatus::Changed
            | ChangeStatus::ConflictDetected
            | ChangeStatus::NotChangedNewVersionId
            | ChangeStatus::Unknown => Some(Self::Modified),
            ChangeStatus::NotChanged => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSummary {
    pub version_from: String,
    pub version_to: String,
    pub total_objects: usize,
    pub total_changes: usize,
    pub impact_level: String,
    pub status_breakdown: BTreeMap<String, usize>,
    pub has_conflicts: bool,
    pub conflict_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedChange {
    pub uuid: String,
    pub name: String,
    pub object_type: String,
    pub change_type: ExternalChangeType,
    /// Underlying comparator status
    pub status: ChangeStatus,
    pub old_version_id: Option<String>,
    pub new_version_id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_diff: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalImpactAssessment {
    pub high_impact_changes: usize,
    pub risk_factors: Vec<String>,
    pub affected_object_types: Vec<String>,
    pub requires_review: bool,
}

/// Comparison report in the external schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReport {
    pub summary: ExternalSummary,
    pub changes_by_category: BTreeMap<String, CategoryCounts>,
    pub detailed_changes: Vec<DetailedChange>,
    pub impact_assessment: ExternalImpactAssessment,
    /// `"[object name] message"` lines
    pub diagnostics: Vec<String>,
}

fn detailed_change(result: &ComparisonResult) -> Option<DetailedChange> {
    let change_type = ExternalChangeType::for_status(result.status)?;
    Some(DetailedChange {
        uuid: result.uuid().to_string(),
        name: result.name().to_string(),
        object_type: result.object.object_type().to_string(),
        change_type,
        status: result.status,
        old_version_id: result.version_info.old_version_id.clone(),
        new_version_id: result.version_info.new_version_id.clone(),
        content_diff: result.content_diff.summary(),
    })
}

/// Map a comparison report onto the external schema.
#[must_use]
pub fn to_external(report: &ComparisonReport) -> ExternalReport {
    let diagnostics = report
        .results
        .iter()
        .flat_map(|r| {
            let name = r.name();
            let object_diagnostics = r.object.core().diagnostics.iter();
            r.diagnostics
                .iter()
                .chain(object_diagnostics)
                .map(move |msg| format!("[{name}] {msg}"))
        })
        .collect();

    ExternalReport {
        summary: ExternalSummary {
            version_from: report.version_from.clone(),
            version_to: report.version_to.clone(),
            total_objects: report.total_objects,
            total_changes: report.total_changes,
            impact_level: report.impact_level.to_string(),
            status_breakdown: report
                .status_breakdown
                .iter()
                .map(|(status, n)| (status.to_string(), *n))
                .collect(),
            has_conflicts: report.has_conflicts(),
            conflict_count: report.conflict_count,
        },
        changes_by_category: report
            .changes_by_category
            .iter()
            .map(|(category, counts)| (category.key().to_string(), *counts))
            .collect(),
        detailed_changes: report.results.iter().filter_map(detailed_change).collect(),
        impact_assessment: ExternalImpactAssessment {
            high_impact_changes: report.impact.high_impact_changes,
            risk_factors: report.impact.risk_factors.clone(),
            affected_object_types: report.impact.affected_object_types.clone(),
            requires_review: report.impact.requires_review,
        },
        diagnostics,
    }
}
