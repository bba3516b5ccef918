//! Comparison report aggregation: status and category breakdowns, impact
//! level and risk assessment.

use super::{ChangeStatus, ComparisonResult};
use crate::model::{ObjectCategory, ObjectType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Overall impact of a comparison, from the number of changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactLevel {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ImpactLevel {
    #[must_use]
    pub const fn from_changes(changes: usize) -> Self {
        match changes {
            0 => Self::None,
            1..=10 => Self::Low,
            11..=50 => Self::Medium,
            51..=100 => Self::High,
            _ => Self::VeryHigh,
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY_HIGH",
        })
    }
}

/// Per-category change counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
    pub total: usize,
}

impl CategoryCounts {
    fn record(&mut self, status: ChangeStatus) {
        self.total += 1;
        match status {
            ChangeStatus::New => self.added += 1,
            ChangeStatus::Removed => self.removed += 1,
            ChangeStatus::NotChanged => self.unchanged += 1,
            ChangeStatus::Changed
            | ChangeStatus::ConflictDetected
            | ChangeStatus::NotChangedNewVersionId => self.modified += 1,
            ChangeStatus::Unknown => {}
        }
    }
}

/// Risk policy applied when assessing impact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskPolicy {
    pub high_impact_types: Vec<ObjectType>,
    /// More removals than this is a risk
    pub removed_risk_threshold: usize,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            high_impact_types: vec![
                ObjectType::ProcessModel,
                ObjectType::RecordType,
                ObjectType::Integration,
                ObjectType::ConnectedSystem,
            ],
            removed_risk_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub high_impact_changes: usize,
    pub risk_factors: Vec<String>,
    /// Object types with at least one change, sorted
    pub affected_object_types: Vec<String>,
    pub requires_review: bool,
}

/// Aggregated outcome of one two-way comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub version_from: String,
    pub version_to: String,
    pub total_objects: usize,
    /// Every result except `NotChanged`
    pub total_changes: usize,
    pub impact_level: ImpactLevel,
    /// Exact partition of results by status, all seven present
    pub status_breakdown: BTreeMap<ChangeStatus, usize>,
    pub conflict_count: usize,
    pub changes_by_category: BTreeMap<ObjectCategory, CategoryCounts>,
    pub impact: ImpactAssessment,
    pub results: Vec<ComparisonResult>,
}

impl ComparisonReport {
    /// Aggregate comparison results under a risk policy.
    pub fn generate(
        version_from: impl Into<String>,
        version_to: impl Into<String>,
        results: Vec<ComparisonResult>,
        policy: &RiskPolicy,
    ) -> Self {
        let mut status_breakdown: BTreeMap<ChangeStatus, usize> =
            ChangeStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut changes_by_category: BTreeMap<ObjectCategory, CategoryCounts> = BTreeMap::new();
        let mut affected = BTreeSet::new();
        let mut high_impact_changes = 0;

        for result in &results {
            *status_breakdown.entry(result.status).or_default() += 1;
            let object_type = result.object.object_type();
            changes_by_category
                .entry(object_type.category())
                .or_default()
                .record(result.status);
            if result.status.is_change() {
                affected.insert(object_type.to_string());
                if policy.high_impact_types.contains(object_type) {
                    high_impact_changes += 1;
                }
            }
        }

        let count = |status| status_breakdown.get(&status).copied().unwrap_or(0);
        let conflict_count = count(ChangeStatus::ConflictDetected);
        let removed = count(ChangeStatus::Removed);
        let total_changes = results.iter().filter(|r| r.status.is_change()).count();

        let mut risk_factors = Vec::new();
        if conflict_count > 0 {
            risk_factors.push(format!(
                "{conflict_count} object(s) have conflicting version histories"
            ));
        }
        if high_impact_changes > 0 {
            let kinds = policy
                .high_impact_types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            risk_factors.push(format!(
                "{high_impact_changes} change(s) to high-impact objects ({kinds})"
            ));
        }
        if removed > policy.removed_risk_threshold {
            risk_factors.push(format!(
                "{removed} objects removed (threshold {})",
                policy.removed_risk_threshold
            ));
        }

        let impact_level = ImpactLevel::from_changes(total_changes);
        tracing::info!(
            total = results.len(),
            changes = total_changes,
            impact = %impact_level,
            risks = risk_factors.len(),
            "comparison report generated"
        );

        Self {
            version_from: version_from.into(),
            version_to: version_to.into(),
            total_objects: results.len(),
            total_changes,
            impact_level,
            status_breakdown,
            conflict_count,
            changes_by_category,
            impact: ImpactAssessment {
                high_impact_changes,
                requires_review: !risk_factors.is_empty(),
                risk_factors,
                affected_object_types: affected.into_iter().collect(),
            },
            results,
        }
    }

    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        self.conflict_count > 0
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.total_changes > 0
    }

    /// Results with the given status.
    pub fn with_status(&self, status: ChangeStatus) -> impl Iterator<Item = &ComparisonResult> {
        self.results.iter().filter(move |r| r.status == status)
    }
}
