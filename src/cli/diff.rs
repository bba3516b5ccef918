//! Diff command handlers.
//!
//! Implements the `diff` and `three-way` subcommands.

use super::emit;
use crate::config::{AppConfig, BehaviorConfig};
use crate::diff::{ComparisonReport, ThreeWayResult};
use crate::pipeline::{
    AnalysisContext, PipelineError, analyze_path, compare_analyses, exit_codes, three_way_paths,
};
use anyhow::Result;
use std::path::Path;

/// Run the diff command, returning the desired exit code.
pub fn run_diff(old: &Path, new: &Path, config: &AppConfig) -> Result<i32> {
    let ctx = AnalysisContext::new();
    let analyze = |path: &Path| {
        analyze_path(path, config, &ctx).map_err(|source| PipelineError::AnalysisFailed {
            path: path.display().to_string(),
            source,
        })
    };
    let old_analysis = analyze(old)?;
    let new_analysis = analyze(new)?;

    let comparison = {
        let _span = ctx.span("compare").entered();
        compare_analyses(old_analysis, new_analysis, config)
            .map_err(|source| PipelineError::ComparisonFailed { source })?
    };

    emit(config, |reporter, report_config| {
        reporter.generate_comparison_report(&comparison.report, report_config)
    })
    .map_err(|source| PipelineError::ReportFailed { source })?;

    Ok(comparison_exit_code(&config.behavior, &comparison.report))
}

/// Run the three-way command, returning the desired exit code.
pub fn run_three_way(
    base: &Path,
    customer: &Path,
    vendor: &Path,
    config: &AppConfig,
) -> Result<i32> {
    let ctx = AnalysisContext::new();
    let result = three_way_paths(base, customer, vendor, config, &ctx)
        .map_err(|source| PipelineError::ComparisonFailed { source })?;

    emit(config, |reporter, report_config| {
        reporter.generate_three_way_report(&result, report_config)
    })
    .map_err(|source| PipelineError::ReportFailed { source })?;

    Ok(three_way_exit_code(&config.behavior, &result))
}

fn comparison_exit_code(behavior: &BehaviorConfig, report: &ComparisonReport) -> i32 {
    if behavior.fail_on_conflict && report.has_conflicts() {
        return exit_codes::CONFLICTS_DETECTED;
    }
    if behavior.fail_on_change && report.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}

fn three_way_exit_code(behavior: &BehaviorConfig, result: &ThreeWayResult) -> i32 {
    if behavior.fail_on_conflict && result.conflicts() > 0 {
        return exit_codes::CONFLICTS_DETECTED;
    }
    if behavior.fail_on_change && result.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{ChangeStatus, ComparisonResult, RiskPolicy, VersionInfo};
    use crate::model::{AppObject, ObjectCore, ObjectType, SimpleObject};
    use std::sync::Arc;

    fn report(status: ChangeStatus) -> ComparisonReport {
        let result = ComparisonResult {
            status,
            object: Arc::new(AppObject::Simple(SimpleObject::new(ObjectCore::new(
                "u-1",
                "Rule",
                ObjectType::ExpressionRule,
            )))),
            old_object: None,
            version_info: VersionInfo::default(),
            content_diff: Default::default(),
            diagnostics: Vec::new(),
        };
        ComparisonReport::generate("a", "b", vec![result], &RiskPolicy::default())
    }

    #[test]
    fn test_exit_codes_follow_flags() {
        let quiet = BehaviorConfig::default();
        let strict = BehaviorConfig {
            fail_on_conflict: true,
            fail_on_change: true,
            ..BehaviorConfig::default()
        };

        let conflict = report(ChangeStatus::ConflictDetected);
        assert_eq!(comparison_exit_code(&quiet, &conflict), exit_codes::SUCCESS);
        assert_eq!(
            comparison_exit_code(&strict, &conflict),
            exit_codes::CONFLICTS_DETECTED
        );

        let changed = report(ChangeStatus::Changed);
        assert_eq!(
            comparison_exit_code(&strict, &changed),
            exit_codes::CHANGES_DETECTED
        );

        let same = report(ChangeStatus::NotChanged);
        assert_eq!(comparison_exit_code(&strict, &same), exit_codes::SUCCESS);
    }

    #[test]
    fn test_missing_package_fails() {
        let err = run_diff(
            Path::new("/nonexistent/old.zip"),
            Path::new("/nonexistent/new.zip"),
            &AppConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Analysis failed"));
    }
}
