//! Dual-layer classification scenarios.
//!
//! Each scenario models a realistic export history: an object edited on
//! one line of development, re-exported without edits, or forked and
//! edited independently.

use blueprint_tools::content::DiffHasher;
use blueprint_tools::diff::{
    ChangeStatus, ComparatorConfig, ComparisonReport, DualLayerComparator, ImpactLevel,
    MergeClass, RiskPolicy, ThreeWayComparator,
};
use blueprint_tools::model::{
    AppObject, ObjectCore, ObjectDirectory, ObjectType, SimpleObject, VersionEntry,
};
use blueprint_tools::reports::{ExternalChangeType, to_external};
use std::sync::Arc;

struct Export<'a> {
    uuid: &'a str,
    version: Option<&'a str>,
    lineage: &'a [&'a str],
    body: &'a str,
}

impl Export<'_> {
    fn raw(&self) -> String {
        let version = self
            .version
            .map(|v| format!("<versionUuid>{v}</versionUuid>"))
            .unwrap_or_default();
        let history: String = self
            .lineage
            .iter()
            .map(|v| format!(r#"<historyInfo versionUuid="{v}"/>"#))
            .collect();
        format!(
            "<contentHaul>\n  <rule uuid=\"{}\">\n    {version}\n    <history>{history}</history>\n    <definition>{}</definition>\n  </rule>\n</contentHaul>",
            self.uuid, self.body
        )
    }

    fn object(&self) -> Arc<AppObject> {
        let mut core = ObjectCore::new(self.uuid, format!("rule {}", self.uuid), ObjectType::ExpressionRule)
            .with_raw_document(self.raw())
            .with_lineage(self.lineage.iter().map(|v| VersionEntry::new(*v)).collect());
        core.version_id = self.version.map(str::to_string);
        Arc::new(AppObject::Simple(SimpleObject::new(core)))
    }
}

fn compare(old: &Export<'_>, new: &Export<'_>) -> ChangeStatus {
    DualLayerComparator::new()
        .compare(Some(&old.object()), Some(&new.object()))
        .expect("compare")
        .status
}

fn directory(exports: &[Export<'_>]) -> ObjectDirectory {
    let mut dir = ObjectDirectory::new();
    for export in exports {
        dir.add(export.object().as_ref().clone()).expect("add");
    }
    dir
}

#[test]
fn test_linear_edit_is_changed() {
    let old = Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "a + b" };
    let new = Export { uuid: "r-1", version: Some("v2"), lineage: &["v1"], body: "a + b + c" };
    assert_eq!(compare(&old, &new), ChangeStatus::Changed);
}

#[test]
fn test_reexport_without_edit_is_version_only() {
    let old = Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "a + b" };
    let new = Export { uuid: "r-1", version: Some("v2"), lineage: &["v1"], body: "a + b" };
    assert_eq!(compare(&old, &new), ChangeStatus::NotChangedNewVersionId);

    // Lineage that also lists the current version
    let new = Export { lineage: &["v2", "v1"], ..new };
    assert_eq!(compare(&old, &new), ChangeStatus::NotChangedNewVersionId);
}

#[test]
fn test_lineage_without_old_version_conflicts() {
    let old = Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "a" };
    let new = Export { uuid: "r-1", version: Some("v3"), lineage: &["v2", "v3"], body: "b" };
    assert_eq!(compare(&old, &new), ChangeStatus::ConflictDetected);
}

#[test]
fn test_forked_histories_conflict() {
    let old = Export { uuid: "r-1", version: Some("v2a"), lineage: &["v1"], body: "a * 2" };
    let new = Export { uuid: "r-1", version: Some("v2b"), lineage: &["v1"], body: "a * 3" };
    assert_eq!(compare(&old, &new), ChangeStatus::ConflictDetected);
}

#[test]
fn test_forked_histories_with_identical_content_are_refined() {
    let old = Export { uuid: "r-1", version: Some("v2a"), lineage: &["v1"], body: "a * 2" };
    let new = Export { uuid: "r-1", version: Some("v2b"), lineage: &["v1"], body: "a * 2" };
    assert_eq!(compare(&old, &new), ChangeStatus::NotChangedNewVersionId);
}

#[test]
fn test_missing_version_is_unknown_even_with_identical_content() {
    let old = Export { uuid: "r-1", version: None, lineage: &[], body: "x" };
    let new = Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "x" };
    assert_eq!(compare(&old, &new), ChangeStatus::Unknown);
}

#[test]
fn test_version_bookkeeping_does_not_affect_hash() {
    let hasher = DiffHasher::default();
    let old = Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "a + b" };
    let new = Export { uuid: "r-1", version: Some("v9"), lineage: &["v8", "v7", "v1"], body: "a + b" };
    assert_eq!(hasher.hash(&old.raw()), hasher.hash(&new.raw()));

    let edited = Export { body: "a - b", ..new };
    assert_ne!(hasher.hash(&old.raw()), hasher.hash(&edited.raw()));
}

#[test]
fn test_hash_cap_keeps_layer_one() {
    let body = "x".repeat(200);
    let old = Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: &body };
    let new = Export { uuid: "r-1", version: Some("v2"), lineage: &["v1"], body: &body };

    let comparator = DualLayerComparator::with_config(ComparatorConfig {
        max_hash_chars: 50,
        ..ComparatorConfig::default()
    });
    let result = comparator
        .compare(Some(&old.object()), Some(&new.object()))
        .expect("compare");
    assert_eq!(result.status, ChangeStatus::Changed);
    assert!(result.diagnostics.iter().any(|d| d.contains("unavailable")));
}

#[test]
fn test_report_over_mixed_release() {
    let old = directory(&[
        Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "1" },
        Export { uuid: "r-2", version: Some("v1"), lineage: &[], body: "2" },
        Export { uuid: "r-3", version: Some("v1"), lineage: &[], body: "3" },
        Export { uuid: "r-4", version: Some("v1"), lineage: &[], body: "4" },
    ]);
    let new = directory(&[
        Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "1" },
        Export { uuid: "r-2", version: Some("v2"), lineage: &["v1"], body: "2" },
        Export { uuid: "r-3", version: Some("v2"), lineage: &["v1"], body: "33" },
        Export { uuid: "r-5", version: Some("v1"), lineage: &[], body: "5" },
    ]);

    let results = DualLayerComparator::new()
        .compare_directories(&old, &new)
        .expect("compare");
    let report = ComparisonReport::generate("1.0", "2.0", results, &RiskPolicy::default());

    assert_eq!(report.total_objects, 5);
    // Everything except r-1 is a change, version-only bumps included
    assert_eq!(report.total_changes, 4);
    assert_eq!(report.impact_level, ImpactLevel::Low);
    assert_eq!(report.with_status(ChangeStatus::Removed).count(), 1);

    let external = to_external(&report);
    let types: Vec<ExternalChangeType> =
        external.detailed_changes.iter().map(|d| d.change_type).collect();
    assert_eq!(
        types,
        vec![
            ExternalChangeType::Modified,
            ExternalChangeType::Modified,
            ExternalChangeType::Removed,
            ExternalChangeType::Added,
        ]
    );
}

#[test]
fn test_three_way_both_sides_same_edit() {
    let base = directory(&[Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "1" }]);
    let customer =
        directory(&[Export { uuid: "r-1", version: Some("c2"), lineage: &["v1"], body: "2" }]);
    let vendor =
        directory(&[Export { uuid: "r-1", version: Some("n2"), lineage: &["v1"], body: "2" }]);

    let result = ThreeWayComparator::default()
        .compare(&base, &customer, &vendor)
        .expect("three-way");
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].class, MergeClass::BothIdentical);
    assert_eq!(result.conflicts(), 0);
    assert!(result.has_changes());
}

#[test]
fn test_three_way_removal_against_edit_conflicts() {
    let base = directory(&[Export { uuid: "r-1", version: Some("v1"), lineage: &[], body: "1" }]);
    let customer = ObjectDirectory::new();
    let vendor =
        directory(&[Export { uuid: "r-1", version: Some("n2"), lineage: &["v1"], body: "2" }]);

    let result = ThreeWayComparator::default()
        .compare(&base, &customer, &vendor)
        .expect("three-way");
    assert_eq!(result.entries[0].class, MergeClass::Conflict);
    assert_eq!(result.entries[0].customer_status, Some(ChangeStatus::Removed));
}
