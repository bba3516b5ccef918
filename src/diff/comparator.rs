//! Dual-layer version comparator.
//!
//! Layer 1 classifies by version identifiers and lineage. Layer 2 refines a
//! `Changed` or `ConflictDetected` verdict by comparing diff hashes: equal
//! hashes mean only bookkeeping metadata moved.

use super::content_diff::build_content_diff;
use super::{ChangeStatus, ComparisonResult, VersionInfo};
use crate::content::{DEFAULT_MAX_HASH_CHARS, DiffHash, DiffHasher};
use crate::error::{BlueprintError, ComparisonErrorKind, Result};
use crate::model::{AppObject, ObjectDirectory, lineage_contains};
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Comparator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparatorConfig {
    /// Run Layer 2 on Layer 1 changes and conflicts
    pub content_hash_refinement: bool,
    /// Documents longer than this are not hashed
    pub max_hash_chars: usize,
    /// Compare directories with rayon
    pub parallel: bool,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            content_hash_refinement: true,
            max_hash_chars: DEFAULT_MAX_HASH_CHARS,
            parallel: true,
        }
    }
}

/// Layer 1 verdict for two present objects.
fn classify_versions(old: &AppObject, new: &AppObject) -> (ChangeStatus, String) {
    let (Some(old_id), Some(new_id)) = (old.version_id(), new.version_id()) else {
        let side = match (old.version_id(), new.version_id()) {
            (None, None) => "either side",
            (None, Some(_)) => "the old side",
            _ => "the new side",
        };
        return (
            ChangeStatus::Unknown,
            format!("no version id on {side}"),
        );
    };
    if old_id == new_id {
        return (
            ChangeStatus::NotChanged,
            format!("version ids identical ({old_id})"),
        );
    }
    let lineage = &new.core().version_lineage;
    if lineage_contains(old_id, lineage) {
        (
            ChangeStatus::Changed,
            format!("old version {old_id} found in new lineage, new version {new_id}"),
        )
    } else {
        (
            ChangeStatus::ConflictDetected,
            format!(
                "old version {old_id} not in new lineage ({} entries), versions diverged",
                lineage.len()
            ),
        )
    }
}

/// Classifies objects across two versions.
#[derive(Debug, Clone, Default)]
pub struct DualLayerComparator {
    config: ComparatorConfig,
}

impl DualLayerComparator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_config(config: ComparatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Diff hash of an object, reusing a precomputed one when present.
    ///
    /// Objects without a raw document have no hash.
    #[must_use]
    pub fn diff_hash<'o>(&self, object: &'o AppObject) -> Option<Cow<'o, DiffHash>> {
        let core = object.core();
        if let Some(hash) = &core.diff_hash {
            return Some(Cow::Borrowed(hash));
        }
        if core.raw_document.trim().is_empty() {
            return None;
        }
        Some(Cow::Owned(
            DiffHasher::new(self.config.max_hash_chars).hash(&core.raw_document),
        ))
    }

    /// Classify one object.
    ///
    /// Fails only when both sides are absent, which is a caller contract
    /// violation.
    pub fn compare(
        &self,
        old: Option<&Arc<AppObject>>,
        new: Option<&Arc<AppObject>>,
    ) -> Result<ComparisonResult> {
        let version_info = VersionInfo::capture(old.map(Arc::as_ref), new.map(Arc::as_ref));
        let (old, new) = match (old, new) {
            (None, None) => {
                return Err(BlueprintError::comparison(
                    "dual-layer compare",
                    ComparisonErrorKind::BothSidesMissing,
                ));
            }
            (None, Some(new)) => {
                return Ok(ComparisonResult {
                    status: ChangeStatus::New,
                    object: Arc::clone(new),
                    old_object: None,
                    version_info,
                    content_diff: Default::default(),
                    diagnostics: vec!["present only in the new version".to_string()],
                });
            }
            (Some(old), None) => {
                return Ok(ComparisonResult {
                    status: ChangeStatus::Removed,
                    object: Arc::clone(old),
                    old_object: Some(Arc::clone(old)),
                    version_info,
                    content_diff: Default::default(),
                    diagnostics: vec!["present only in the old version".to_string()],
                });
            }
            (Some(old), Some(new)) => (old, new),
        };

        let (layer1, reason) = classify_versions(old, new);
        let mut diagnostics = vec![format!("layer 1: {layer1} ({reason})")];
        let status = if layer1.is_refinable() && self.config.content_hash_refinement {
            self.refine(old, new, layer1, &mut diagnostics)
        } else {
            layer1
        };

        Ok(ComparisonResult {
            status,
            object: Arc::clone(new),
            old_object: Some(Arc::clone(old)),
            version_info,
            content_diff: build_content_diff(old, new),
            diagnostics,
        })
    }

    fn refine(
        &self,
        old: &AppObject,
        new: &AppObject,
        layer1: ChangeStatus,
        diagnostics: &mut Vec<String>,
    ) -> ChangeStatus {
        let old_hash = self.diff_hash(old);
        let new_hash = self.diff_hash(new);
        let (Some(old_hash), Some(new_hash)) = (old_hash, new_hash) else {
            diagnostics.push(format!(
                "layer 2: raw document missing, keeping {layer1}"
            ));
            return layer1;
        };
        match (old_hash.digest(), new_hash.digest()) {
            (Some(a), Some(b)) if a == b => {
                let refined = ChangeStatus::NotChangedNewVersionId;
                diagnostics.push(format!(
                    "layer 2: content hashes identical, {layer1} refined to {refined}"
                ));
                refined
            }
            (Some(_), Some(_)) => {
                diagnostics.push(format!("layer 2: content hashes differ, keeping {layer1}"));
                layer1
            }
            _ => {
                diagnostics.push(format!(
                    "layer 2: content hash unavailable (document over {} chars), keeping {layer1}",
                    self.config.max_hash_chars
                ));
                layer1
            }
        }
    }

    /// Classify every UUID present in either directory, sorted by UUID.
    pub fn compare_directories(
        &self,
        old: &ObjectDirectory,
        new: &ObjectDirectory,
    ) -> Result<Vec<ComparisonResult>> {
        let uuids: Vec<&str> = old
            .uuids()
            .chain(new.uuids())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let compare = |uuid: &&str| self.compare(old.get(uuid), new.get(uuid));
        let results = if self.config.parallel {
            uuids.par_iter().map(compare).collect::<Result<Vec<_>>>()?
        } else {
            uuids.iter().map(compare).collect::<Result<Vec<_>>>()?
        };

        let mut counts: BTreeMap<ChangeStatus, usize> = BTreeMap::new();
        for result in &results {
            *counts.entry(result.status).or_default() += 1;
        }
        tracing::info!(
            total = results.len(),
            breakdown = %counts
                .iter()
                .map(|(status, n)| format!("{status}={n}"))
                .collect::<Vec<_>>()
                .join(" "),
            "directory comparison complete"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectCore, ObjectType, SimpleObject, VersionEntry};

    fn obj(version: Option<&str>, lineage: &[&str], raw: &str) -> Arc<AppObject> {
        let mut core = ObjectCore::new("u-1", "Rule", ObjectType::ExpressionRule)
            .with_raw_document(raw)
            .with_lineage(lineage.iter().map(|v| VersionEntry::new(*v)).collect());
        core.version_id = version.map(str::to_string);
        Arc::new(AppObject::Simple(SimpleObject::new(core)))
    }

    fn doc(version: &str, body: &str) -> String {
        format!("<rule><versionUuid>{version}</versionUuid><definition>{body}</definition></rule>")
    }

    #[test]
    fn test_one_sided_pairs() {
        let c = DualLayerComparator::new();
        let o = obj(Some("v1"), &[], "");
        assert_eq!(c.compare(None, Some(&o)).expect("new").status, ChangeStatus::New);
        let removed = c.compare(Some(&o), None).expect("removed");
        assert_eq!(removed.status, ChangeStatus::Removed);
        assert!(removed.old_object.is_some());
    }

    #[test]
    fn test_both_absent_is_an_error() {
        let err = DualLayerComparator::new().compare(None, None).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_missing_version_is_unknown() {
        let c = DualLayerComparator::new();
        let result = c
            .compare(Some(&obj(None, &[], "a")), Some(&obj(Some("v1"), &[], "a")))
            .expect("compare");
        assert_eq!(result.status, ChangeStatus::Unknown);
        assert!(result.diagnostics[0].contains("old side"));
    }

    #[test]
    fn test_same_version_not_changed() {
        let c = DualLayerComparator::new();
        let a = obj(Some("v1"), &["v1"], &doc("v1", "1"));
        let result = c.compare(Some(&a), Some(&a)).expect("compare");
        assert_eq!(result.status, ChangeStatus::NotChanged);
        assert!(result.content_diff.is_empty());
    }

    #[test]
    fn test_lineage_change_refined_to_new_version_id() {
        let c = DualLayerComparator::new();
        let old = obj(Some("v1"), &["v1"], &doc("v1", "1 + 1"));
        let new = obj(Some("v2"), &["v2", "v1"], &doc("v2", "1 + 1"));
        let result = c.compare(Some(&old), Some(&new)).expect("compare");
        assert_eq!(result.status, ChangeStatus::NotChangedNewVersionId);
        assert!(result.version_info.old_in_new_lineage);
        assert_eq!(result.diagnostics.len(), 2);
        assert!(result.diagnostics[1].contains("CHANGED refined to NOT_CHANGED_NEW_VUUID"));
    }

    #[test]
    fn test_lineage_change_with_new_content() {
        let c = DualLayerComparator::new();
        let old = obj(Some("v1"), &["v1"], &doc("v1", "1 + 1"));
        let new = obj(Some("v2"), &["v2", "v1"], &doc("v2", "1 + 2"));
        let result = c.compare(Some(&old), Some(&new)).expect("compare");
        assert_eq!(result.status, ChangeStatus::Changed);
        assert!(!result.content_diff.is_empty());
    }

    #[test]
    fn test_divergent_lineage_is_conflict() {
        let c = DualLayerComparator::new();
        let old = obj(Some("v1"), &["v1"], &doc("v1", "a"));
        let new = obj(Some("v3"), &["v2", "v3"], &doc("v3", "b"));
        let result = c.compare(Some(&old), Some(&new)).expect("compare");
        assert_eq!(result.status, ChangeStatus::ConflictDetected);
        assert!(!result.version_info.old_in_new_lineage);
    }

    #[test]
    fn test_refinement_disabled_keeps_layer_one() {
        let c = DualLayerComparator::with_config(ComparatorConfig {
            content_hash_refinement: false,
            ..ComparatorConfig::default()
        });
        let old = obj(Some("v1"), &["v1"], &doc("v1", "x"));
        let new = obj(Some("v2"), &["v2", "v1"], &doc("v2", "x"));
        let result = c.compare(Some(&old), Some(&new)).expect("compare");
        assert_eq!(result.status, ChangeStatus::Changed);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_oversized_documents_keep_layer_one() {
        let c = DualLayerComparator::with_config(ComparatorConfig {
            max_hash_chars: 10,
            ..ComparatorConfig::default()
        });
        let old = obj(Some("v1"), &["v1"], &doc("v1", "same"));
        let new = obj(Some("v2"), &["v2", "v1"], &doc("v2", "same"));
        let result = c.compare(Some(&old), Some(&new)).expect("compare");
        assert_eq!(result.status, ChangeStatus::Changed);
        assert!(result.diagnostics[1].contains("unavailable"));
    }

    #[test]
    fn test_compare_directories_covers_union() {
        let mut old = ObjectDirectory::new();
        let mut new = ObjectDirectory::new();
        let mk = |uuid: &str, version: &str| {
            AppObject::Simple(SimpleObject::new(
                ObjectCore::new(uuid, format!("obj {uuid}"), ObjectType::Constant)
                    .with_version(version),
            ))
        };
        old.add(mk("b", "v1")).expect("add");
        old.add(mk("a", "v1")).expect("add");
        new.add(mk("a", "v1")).expect("add");
        new.add(mk("c", "v1")).expect("add");

        for parallel in [true, false] {
            let c = DualLayerComparator::with_config(ComparatorConfig {
                parallel,
                ..ComparatorConfig::default()
            });
            let results = c.compare_directories(&old, &new).expect("compare");
            let got: Vec<_> = results.iter().map(|r| (r.uuid(), r.status)).collect();
            assert_eq!(
                got,
                vec![
                    ("a", ChangeStatus::NotChanged),
                    ("b", ChangeStatus::Removed),
                    ("c", ChangeStatus::New),
                ]
            );
        }
    }
}
