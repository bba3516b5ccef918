//! Comparison stages: two-way, three-way, and flows against a previous run.

use super::{AnalysisContext, PackageAnalysis, analyze_path};
use crate::config::AppConfig;
use crate::diff::{
    ComparisonReport, DualLayerComparator, ProcessModelComparison, ThreeWayComparator,
    ThreeWayResult, compare_process_models,
};
use crate::model::Blueprint;
use anyhow::{Context, Result};
use std::path::Path;

/// Two analyzed packages and their comparison report.
#[derive(Debug, Clone)]
pub struct TwoWayComparison {
    pub old: PackageAnalysis,
    pub new: PackageAnalysis,
    pub report: ComparisonReport,
}

/// Compare two already-analyzed packages.
pub fn compare_analyses(
    old: PackageAnalysis,
    new: PackageAnalysis,
    config: &AppConfig,
) -> Result<TwoWayComparison> {
    let comparator = DualLayerComparator::with_config(config.comparator_config());
    let results = comparator
        .compare_directories(&old.directory, &new.directory)
        .context("Failed to compare packages")?;
    let report = ComparisonReport::generate(
        old.blueprint.metadata.source_name.clone(),
        new.blueprint.metadata.source_name.clone(),
        results,
        &config.comparison.risk_policy(),
    );
    Ok(TwoWayComparison { old, new, report })
}

/// Analyze and compare two packages.
pub fn compare_paths(
    old: &Path,
    new: &Path,
    config: &AppConfig,
    ctx: &AnalysisContext,
) -> Result<TwoWayComparison> {
    let old = analyze_path(old, config, ctx)?;
    let new = analyze_path(new, config, ctx)?;
    let _span = ctx.span("compare").entered();
    compare_analyses(old, new, config)
}

/// Analyze three packages and classify each object for a merge.
pub fn three_way_paths(
    base: &Path,
    customer: &Path,
    vendor: &Path,
    config: &AppConfig,
    ctx: &AnalysisContext,
) -> Result<ThreeWayResult> {
    let base = analyze_path(base, config, ctx)?;
    let customer = analyze_path(customer, config, ctx)?;
    let vendor = analyze_path(vendor, config, ctx)?;

    let _span = ctx.span("three-way").entered();
    let comparator =
        ThreeWayComparator::new(DualLayerComparator::with_config(config.comparator_config()));
    comparator
        .compare(&base.directory, &customer.directory, &vendor.directory)
        .context("Failed to run three-way comparison")
}

/// Load a blueprint previously written as JSON.
pub fn load_blueprint(path: &Path) -> Result<Blueprint> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read previous analysis: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse previous analysis: {}", path.display()))
}

/// Node and flow comparison for every process model present in both blueprints.
///
/// Models are listed in the order of `current`.
#[must_use]
pub fn compare_blueprint_flows(
    previous: &Blueprint,
    current: &Blueprint,
) -> Vec<ProcessModelComparison> {
    current
        .process_models
        .iter()
        .filter_map(|model| {
            previous
                .process_model(&model.core.uuid)
                .map(|old| compare_process_models(old, model))
        })
        .collect()
}

/// Compare a package's process flows against a persisted previous blueprint.
pub fn compare_with_previous(
    previous: &Path,
    package: &Path,
    config: &AppConfig,
    ctx: &AnalysisContext,
) -> Result<Vec<ProcessModelComparison>> {
    let previous = load_blueprint(previous)?;
    let current = analyze_path(package, config, ctx)?;

    let _span = ctx.span("flows").entered();
    let comparisons = compare_blueprint_flows(&previous, &current.blueprint);
    tracing::info!(
        compared = comparisons.len(),
        changed = comparisons.iter().filter(|c| c.has_changes()).count(),
        "flow comparison complete"
    );
    Ok(comparisons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveEntry, PackageArchive};
    use crate::diff::ChangeStatus;
    use crate::pipeline::analyze_archive;

    fn package(name: &str, version: &str, body: &str) -> PackageAnalysis {
        let xml = format!(
            r#"<contentHaul><rule name="calc" uuid="r-1"><definition>{body}</definition><versionUuid>{version}</versionUuid></rule></contentHaul>"#
        );
        let archive = PackageArchive::from_entries(
            name,
            vec![ArchiveEntry {
                path: "content/r-1.xml".to_string(),
                content: xml,
            }],
        );
        analyze_archive(&archive, &AppConfig::default())
    }

    #[test]
    fn test_report_uses_package_names() {
        let cmp = compare_analyses(
            package("v1.zip", "v1", "1 + 1"),
            package("v2.zip", "v1", "1 + 1"),
            &AppConfig::default(),
        )
        .expect("compare");
        assert_eq!(cmp.report.version_from, "v1.zip");
        assert_eq!(cmp.report.version_to, "v2.zip");
        assert_eq!(cmp.report.results[0].status, ChangeStatus::NotChanged);
        assert!(!cmp.report.has_changes());
    }

    #[test]
    fn test_blueprint_flows_only_shared_models() {
        let empty = Blueprint::from_directory(
            "x",
            &crate::model::ObjectDirectory::new(),
            chrono::Utc::now(),
        );
        assert!(compare_blueprint_flows(&empty, &empty).is_empty());
    }

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct LogCapture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl LogCapture {
        fn count(&self, message: &str) -> usize {
            let bytes = self.0.lock().expect("lock");
            String::from_utf8_lossy(&bytes).matches(message).count()
        }
    }

    fn write_package(root: &Path, name: &str, version: &str, body: &str) -> std::path::PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(dir.join("content")).expect("mkdir");
        std::fs::write(
            dir.join("content/r-1.xml"),
            format!(
                r#"<contentHaul><rule name="calc" uuid="r-1"><definition>{body}</definition><versionUuid>{version}</versionUuid></rule></contentHaul>"#
            ),
        )
        .expect("write");
        dir
    }

    #[test]
    fn test_comparison_summaries_logged_once() {
        let logs = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let config = AppConfig::builder().parallel(false).build();
        let dir = tempfile::tempdir().expect("tempdir");

        tracing::subscriber::with_default(subscriber, || {
            compare_analyses(
                package("v1.zip", "v1", "1 + 1"),
                package("v2.zip", "v2", "1 + 2"),
                &config,
            )
            .expect("compare");

            let base = write_package(dir.path(), "base", "v1", "1");
            let customer = write_package(dir.path(), "customer", "c2", "2");
            let vendor = write_package(dir.path(), "vendor", "v1", "1");
            three_way_paths(&base, &customer, &vendor, &config, &AnalysisContext::new())
                .expect("three-way");
        });

        assert_eq!(logs.count("comparison report generated"), 1);
        assert_eq!(logs.count("three-way comparison complete"), 1);
    }

    #[test]
    fn test_load_blueprint_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prev.json");
        std::fs::write(&path, "{not json").expect("write");
        let err = load_blueprint(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse previous analysis"));
        assert!(load_blueprint(&dir.path().join("missing.json")).is_err());
    }
}
