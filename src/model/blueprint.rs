//! Blueprint: the complete structured object graph of one package.

use super::{
    AppObject, ObjectCategory, ObjectDirectory, ObjectType, ProcessModelObject,
    RecordTypeObject, SimpleObject, SiteObject,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Complexity tier derived from the total object count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplexityTier {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ComplexityTier {
    #[must_use]
    pub const fn from_total(total: usize) -> Self {
        match total {
            0..100 => Self::Low,
            100..200 => Self::Medium,
            200..400 => Self::High,
            _ => Self::VeryHigh,
        }
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::VeryHigh => write!(f, "Very High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintMetadata {
    /// File name of the source package
    pub source_name: String,
    pub total_objects: usize,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintSummary {
    /// Object counts keyed by kind tag
    pub counts: BTreeMap<String, usize>,
    pub complexity: ComplexityTier,
    pub recommendations: Vec<String>,
}

/// Structured object graph, one collection per object kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub metadata: BlueprintMetadata,
    pub summary: BlueprintSummary,
    #[serde(default)]
    pub sites: Vec<SiteObject>,
    #[serde(default)]
    pub record_types: Vec<RecordTypeObject>,
    #[serde(default)]
    pub process_models: Vec<ProcessModelObject>,
    #[serde(default)]
    pub interfaces: Vec<SimpleObject>,
    #[serde(default)]
    pub rules: Vec<SimpleObject>,
    #[serde(default)]
    pub constants: Vec<SimpleObject>,
    #[serde(default)]
    pub integrations: Vec<SimpleObject>,
    #[serde(default)]
    pub data_types: Vec<SimpleObject>,
    #[serde(default)]
    pub groups: Vec<SimpleObject>,
    #[serde(default)]
    pub reports: Vec<SimpleObject>,
    #[serde(default)]
    pub other: Vec<SimpleObject>,
}

// Recommendation thresholds
const MANY_INTEGRATIONS: usize = 10;
const MANY_PROCESS_MODELS: usize = 25;
const MANY_INTERFACES: usize = 100;
const MANY_RECORD_TYPES: usize = 30;

impl Blueprint {
    /// Build a blueprint from a completed directory, in ordinal order.
    #[must_use]
    pub fn from_directory(
        source_name: impl Into<String>,
        directory: &ObjectDirectory,
        analyzed_at: DateTime<Utc>,
    ) -> Self {
        let mut blueprint = Self {
            metadata: BlueprintMetadata {
                source_name: source_name.into(),
                total_objects: directory.len(),
                analyzed_at,
            },
            summary: BlueprintSummary {
                counts: BTreeMap::new(),
                complexity: ComplexityTier::from_total(directory.len()),
                recommendations: Vec::new(),
            },
            sites: Vec::new(),
            record_types: Vec::new(),
            process_models: Vec::new(),
            interfaces: Vec::new(),
            rules: Vec::new(),
            constants: Vec::new(),
            integrations: Vec::new(),
            data_types: Vec::new(),
            groups: Vec::new(),
            reports: Vec::new(),
            other: Vec::new(),
        };

        for object in directory.objects() {
            *blueprint
                .summary
                .counts
                .entry(object.object_type().to_string())
                .or_insert(0) += 1;
            blueprint.push(object.as_ref().clone());
        }
        blueprint.summary.recommendations = blueprint.recommendations();
        blueprint
    }

    fn push(&mut self, object: AppObject) {
        match object {
            AppObject::Site(site) => self.sites.push(site),
            AppObject::RecordType(rt) => self.record_types.push(rt),
            AppObject::ProcessModel(pm) => self.process_models.push(pm),
            AppObject::Simple(simple) => {
                let bucket = match simple.core.object_type.category() {
                    ObjectCategory::Interfaces => &mut self.interfaces,
                    ObjectCategory::Rules => &mut self.rules,
                    ObjectCategory::Constants => &mut self.constants,
                    ObjectCategory::Integrations => &mut self.integrations,
                    ObjectCategory::DataTypes => &mut self.data_types,
                    ObjectCategory::Groups => &mut self.groups,
                    ObjectCategory::Reports => &mut self.reports,
                    ObjectCategory::Sites
                    | ObjectCategory::RecordTypes
                    | ObjectCategory::ProcessModels
                    | ObjectCategory::Other => &mut self.other,
                };
                bucket.push(simple);
            }
        }
    }

    fn count_of(&self, ty: &ObjectType) -> usize {
        self.summary.counts.get(ty.as_str()).copied().unwrap_or(0)
    }

    fn recommendations(&self) -> Vec<String> {
        let mut out = Vec::new();
        let integrations = self.integrations.len();
        if integrations > MANY_INTEGRATIONS {
            out.push(format!(
                "High integration count ({integrations}): review external system dependencies"
            ));
        }
        if self.count_of(&ObjectType::ProcessModel) > MANY_PROCESS_MODELS {
            out.push(
                "Large number of process models: consider consolidating shared subprocesses"
                    .to_string(),
            );
        }
        if self.interfaces.len() > MANY_INTERFACES {
            out.push("Many interfaces: look for reusable UI components".to_string());
        }
        if self.record_types.len() > MANY_RECORD_TYPES {
            out.push("Large data model: review record type relationships".to_string());
        }
        if self.summary.complexity >= ComplexityTier::High {
            out.push(format!(
                "{} complexity application: plan upgrades and regression testing accordingly",
                self.summary.complexity
            ));
        }
        out
    }

    /// Process model by uuid.
    #[must_use]
    pub fn process_model(&self, uuid: &str) -> Option<&ProcessModelObject> {
        self.process_models.iter().find(|pm| pm.core.uuid == uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectCore;

    #[test]
    fn test_complexity_thresholds() {
        assert_eq!(ComplexityTier::from_total(0), ComplexityTier::Low);
        assert_eq!(ComplexityTier::from_total(99), ComplexityTier::Low);
        assert_eq!(ComplexityTier::from_total(100), ComplexityTier::Medium);
        assert_eq!(ComplexityTier::from_total(200), ComplexityTier::High);
        assert_eq!(ComplexityTier::from_total(400), ComplexityTier::VeryHigh);
        assert_eq!(ComplexityTier::VeryHigh.to_string(), "Very High");
    }

    #[test]
    fn test_objects_land_in_kind_collections() {
        let mut dir = ObjectDirectory::new();
        for (uuid, ty) in [
            ("i", ObjectType::Interface),
            ("q", ObjectType::QueryRule),
            ("w", ObjectType::WebApi),
            ("x", ObjectType::Other("Feed".to_string())),
        ] {
            dir.add(AppObject::Simple(SimpleObject::new(ObjectCore::new(
                uuid,
                format!("obj {uuid}"),
                ty,
            ))))
            .expect("add");
        }

        let bp = Blueprint::from_directory("app.zip", &dir, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(bp.metadata.total_objects, 4);
        assert_eq!(bp.interfaces.len(), 1);
        assert_eq!(bp.rules.len(), 1);
        assert_eq!(bp.integrations.len(), 1);
        assert_eq!(bp.other.len(), 1);
        assert_eq!(bp.summary.counts.get("Web API"), Some(&1));
        assert_eq!(bp.summary.complexity, ComplexityTier::Low);
        assert!(bp.summary.recommendations.is_empty());
    }

    #[test]
    fn test_integration_recommendation() {
        let mut dir = ObjectDirectory::new();
        for i in 0..12 {
            dir.add(AppObject::Simple(SimpleObject::new(ObjectCore::new(
                format!("int-{i}"),
                format!("Integration {i}"),
                ObjectType::Integration,
            ))))
            .expect("add");
        }
        let bp = Blueprint::from_directory("app.zip", &dir, DateTime::<Utc>::UNIX_EPOCH);
        assert!(
            bp.summary
                .recommendations
                .iter()
                .any(|r| r.contains("integration count"))
        );
    }
}
