//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator, to_external};
use crate::diff::{ComparisonReport, MergeClass, ProcessModelComparison, ThreeWayResult};
use crate::model::Blueprint;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output, overriding the report config when set
    pretty: Option<bool>,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: None }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    fn render<T: Serialize>(&self, value: &T, config: &ReportConfig) -> Result<String, ReportError> {
        let json = if self.pretty.unwrap_or(config.pretty) {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }?;
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
}

impl JsonReportMetadata {
    fn now() -> Self {
        Self {
            tool: ToolInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct JsonThreeWayReport<'a> {
    metadata: JsonReportMetadata,
    counts: &'a BTreeMap<MergeClass, usize>,
    entries: &'a [crate::diff::ThreeWayEntry],
}

#[derive(Serialize)]
struct JsonFlowReport<'a> {
    metadata: JsonReportMetadata,
    process_models: &'a [ProcessModelComparison],
}

impl ReportGenerator for JsonReporter {
    fn generate_blueprint_report(
        &self,
        blueprint: &Blueprint,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(blueprint, config)
    }

    fn generate_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(&to_external(report), config)
    }

    fn generate_three_way_report(
        &self,
        result: &ThreeWayResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let report = JsonThreeWayReport {
            metadata: JsonReportMetadata::now(),
            counts: &result.counts,
            entries: &result.entries,
        };
        self.render(&report, config)
    }

    fn generate_flow_report(
        &self,
        comparisons: &[ProcessModelComparison],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let report = JsonFlowReport {
            metadata: JsonReportMetadata::now(),
            process_models: comparisons,
        };
        self.render(&report, config)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::RiskPolicy;
    use crate::model::ObjectDirectory;

    #[test]
    fn test_blueprint_round_trips() {
        let blueprint = Blueprint::from_directory("app.zip", &ObjectDirectory::new(), Utc::now());
        let json = JsonReporter::new()
            .generate_blueprint_report(&blueprint, &ReportConfig::default())
            .expect("report");
        let back: Blueprint = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, blueprint);
    }

    #[test]
    fn test_comparison_uses_external_schema() {
        let report = ComparisonReport::generate("1", "2", Vec::new(), &RiskPolicy::default());
        let json = JsonReporter::new()
            .pretty(false)
            .generate_comparison_report(&report, &ReportConfig::default())
            .expect("report");
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        for key in [
            "summary",
            "changes_by_category",
            "detailed_changes",
            "impact_assessment",
            "diagnostics",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["summary"]["impact_level"], "NONE");
    }

    #[test]
    fn test_flow_report_has_metadata() {
        let json = JsonReporter::new()
            .generate_flow_report(&[], &ReportConfig::default())
            .expect("report");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["metadata"]["tool"]["name"], "blueprint-tools");
        assert!(value["process_models"].as_array().is_some_and(Vec::is_empty));
    }
}
