//! Blueprint command handler.

use super::emit;
use crate::config::AppConfig;
use crate::pipeline::{AnalysisContext, PipelineError, analyze_path, exit_codes};
use anyhow::Result;
use std::path::Path;

/// Analyze one package and write its blueprint.
pub fn run_blueprint(package: &Path, config: &AppConfig) -> Result<i32> {
    let ctx = AnalysisContext::new();
    let analysis =
        analyze_path(package, config, &ctx).map_err(|source| PipelineError::AnalysisFailed {
            path: package.display().to_string(),
            source,
        })?;

    if !config.behavior.quiet {
        tracing::info!(
            objects = analysis.blueprint.metadata.total_objects,
            skipped = analysis.stats.skipped_entries,
            "blueprint ready"
        );
    }

    emit(config, |reporter, report_config| {
        reporter.generate_blueprint_report(&analysis.blueprint, report_config)
    })
    .map_err(|source| PipelineError::ReportFailed { source })?;
    Ok(exit_codes::SUCCESS)
}
