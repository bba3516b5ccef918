//! Flows command handler.

use super::emit;
use crate::config::AppConfig;
use crate::pipeline::{AnalysisContext, PipelineError, compare_with_previous, exit_codes};
use anyhow::Result;
use std::path::Path;

/// Compare process flows in `package` against a previously written blueprint.
pub fn run_flows(previous: &Path, package: &Path, config: &AppConfig) -> Result<i32> {
    let ctx = AnalysisContext::new();
    let comparisons = compare_with_previous(previous, package, config, &ctx)
        .map_err(|source| PipelineError::ComparisonFailed { source })?;

    emit(config, |reporter, report_config| {
        reporter.generate_flow_report(&comparisons, report_config)
    })
    .map_err(|source| PipelineError::ReportFailed { source })?;

    let changed = comparisons.iter().any(|c| c.has_changes());
    Ok(if config.behavior.fail_on_change && changed {
        exit_codes::CHANGES_DETECTED
    } else {
        exit_codes::SUCCESS
    })
}
