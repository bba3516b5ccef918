//! Pipeline orchestration.
//!
//! Shared logic for the analyze → compare → report workflows, so CLI
//! command handlers stay thin. Stages return `anyhow` errors with file
//! context; [`PipelineError`] tags which stage failed.

mod analyze;
mod compare;
mod context;
mod output;

pub use analyze::{AnalysisStats, PackageAnalysis, analyze_archive, analyze_path};
pub use compare::{
    TwoWayComparison, compare_analyses, compare_blueprint_flows, compare_paths,
    compare_with_previous, load_blueprint, three_way_paths,
};
pub use context::AnalysisContext;
pub use output::{OutputTarget, should_use_color, write_output};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A package could not be read or analyzed
    #[error("Analysis failed for {path}: {source}")]
    AnalysisFailed {
        path: String,
        source: anyhow::Error,
    },

    /// Comparison could not be computed
    #[error("Comparison failed: {source}")]
    ComparisonFailed {
        #[source]
        source: anyhow::Error,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or no fail flag set)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected
    pub const CHANGES_DETECTED: i32 = 1;
    /// Merge conflicts were detected
    pub const CONFLICTS_DETECTED: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHANGES_DETECTED, 1);
        assert_eq!(exit_codes::CONFLICTS_DETECTED, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_pipeline_error_names_stage() {
        let err = PipelineError::AnalysisFailed {
            path: "old.zip".to_string(),
            source: anyhow::anyhow!("not a package"),
        };
        assert_eq!(err.to_string(), "Analysis failed for old.zip: not a package");
    }
}
