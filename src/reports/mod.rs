//! Report generation.
//!
//! Two output formats:
//! - JSON: blueprints as-is, comparisons in the external report schema
//!   (see [`adapter`])
//! - Summary: compact shell-friendly text

pub mod adapter;
mod json;
mod summary;
mod types;

pub use adapter::{ExternalChangeType, ExternalReport, to_external};
pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use types::{ReportConfig, ReportFormat};

use crate::diff::{ComparisonReport, ProcessModelComparison, ThreeWayResult};
use crate::model::Blueprint;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Report for a single analyzed package
    fn generate_blueprint_report(
        &self,
        blueprint: &Blueprint,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Report for a two-way comparison
    fn generate_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Report for a base/customer/vendor comparison
    fn generate_three_way_report(
        &self,
        result: &ThreeWayResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Report for process-model node and flow comparisons
    fn generate_flow_report(
        &self,
        comparisons: &[ProcessModelComparison],
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Write a comparison report to a writer
    fn write_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let text = self.generate_comparison_report(report, config)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
    }
}
