//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{
    ChangeStatus, ComparisonReport, ImpactLevel, MergeClass, ProcessModelComparison,
    ThreeWayResult,
};
use crate::model::{Blueprint, ComplexityTier};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn header(&self, lines: &mut Vec<String>, title: &str) {
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
    }

    fn status_color(status: ChangeStatus) -> &'static str {
        match status {
            ChangeStatus::New => "green",
            ChangeStatus::Removed | ChangeStatus::ConflictDetected => "red",
            ChangeStatus::Changed | ChangeStatus::Unknown => "yellow",
            ChangeStatus::NotChanged | ChangeStatus::NotChangedNewVersionId => "dim",
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_blueprint_report(
        &self,
        blueprint: &Blueprint,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, "Package Blueprint");

        let meta = &blueprint.metadata;
        lines.push(format!("{}  {}", self.color("Package:", "cyan"), meta.source_name));
        lines.push(format!("{}  {}", self.color("Objects:", "cyan"), meta.total_objects));
        let complexity = blueprint.summary.complexity;
        let tier_color = match complexity {
            ComplexityTier::Low => "green",
            ComplexityTier::Medium => "yellow",
            ComplexityTier::High | ComplexityTier::VeryHigh => "red",
        };
        lines.push(format!(
            "{}  {}",
            self.color("Complexity:", "cyan"),
            self.color(&complexity.to_string(), tier_color)
        ));

        if !blueprint.summary.counts.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Objects by kind:", "bold"));
            for (kind, count) in &blueprint.summary.counts {
                lines.push(format!("  {kind:<20} {count:>6}"));
            }
        }

        let failed: usize = blueprint
            .process_models
            .iter()
            .map(|pm| pm.node_summary.failed_nodes)
            .sum();
        if failed > 0 {
            lines.push(String::new());
            lines.push(self.color(
                &format!("{} could not be extracted", plural(failed, "node", "nodes")),
                "yellow",
            ));
        }

        if !blueprint.summary.recommendations.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Recommendations:", "bold"));
            for rec in &blueprint.summary.recommendations {
                lines.push(format!("  - {rec}"));
            }
        }

        Ok(lines.join("\n"))
    }

    fn generate_comparison_report(
        &self,
        report: &ComparisonReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, "Package Comparison Summary");

        lines.push(format!(
            "{}  {} → {}",
            self.color("Versions:", "cyan"),
            report.version_from,
            report.version_to
        ));
        lines.push(format!(
            "{}  {}",
            self.color("Objects:", "cyan"),
            report.total_objects
        ));
        let impact_color = match report.impact_level {
            ImpactLevel::None => "dim",
            ImpactLevel::Low => "green",
            ImpactLevel::Medium => "yellow",
            ImpactLevel::High | ImpactLevel::VeryHigh => "red",
        };
        lines.push(format!(
            "{}  {} ({})",
            self.color("Impact:", "cyan"),
            self.color(&report.impact_level.to_string(), impact_color),
            plural(report.total_changes, "change", "changes")
        ));

        lines.push(String::new());
        lines.push(self.color("Status:", "bold"));
        for (status, count) in report.status_breakdown.iter().filter(|(_, n)| **n > 0) {
            lines.push(format!(
                "  {:<24} {count:>6}",
                self.color(status.as_str(), Self::status_color(*status))
            ));
        }

        let changed: Vec<_> = report
            .results
            .iter()
            .filter(|r| r.status.is_change())
            .collect();
        if changed.is_empty() {
            lines.push(format!("  {}", self.color("No changes", "dim")));
        } else {
            lines.push(String::new());
            lines.push(self.color("Changes:", "bold"));
            for result in changed.iter().take(config.limit(changed.len())) {
                let detail = result.content_diff.summary();
                lines.push(format!(
                    "  {} {} [{}]{}",
                    self.color(result.status.as_str(), Self::status_color(result.status)),
                    result.name(),
                    result.object.object_type(),
                    if detail.is_empty() {
                        String::new()
                    } else {
                        format!(": {detail}")
                    }
                ));
            }
            if config.limit(changed.len()) < changed.len() {
                lines.push(format!(
                    "  {}",
                    self.color(
                        &format!("... {} more", changed.len() - config.limit(changed.len())),
                        "dim"
                    )
                ));
            }
        }

        if report.impact.requires_review {
            lines.push(String::new());
            lines.push(self.color("Review required:", "red"));
            for risk in &report.impact.risk_factors {
                lines.push(format!("  ! {risk}"));
            }
        }

        Ok(lines.join("\n"))
    }

    fn generate_three_way_report(
        &self,
        result: &ThreeWayResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, "Three-Way Comparison Summary");

        for (class, count) in &result.counts {
            lines.push(format!("  {:<16} {count:>6}", class.to_string()));
        }

        let conflicts: Vec<_> = result
            .entries
            .iter()
            .filter(|e| e.class == MergeClass::Conflict)
            .collect();
        if !conflicts.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Conflicts:", "red"));
            for entry in conflicts.iter().take(config.limit(conflicts.len())) {
                lines.push(format!("  {} [{}]", entry.name, entry.object_type));
            }
        }

        Ok(lines.join("\n"))
    }

    fn generate_flow_report(
        &self,
        comparisons: &[ProcessModelComparison],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, "Process Flow Changes");

        let changed: Vec<_> = comparisons.iter().filter(|c| c.has_changes()).collect();
        if changed.is_empty() {
            lines.push(format!("  {}", self.color("No node or flow changes", "dim")));
        }
        for cmp in changed {
            lines.push(self.color(&cmp.name, "cyan"));
            let (n, f) = (&cmp.nodes, &cmp.flows);
            lines.push(format!(
                "  nodes: {} {} {}",
                self.color(&format!("+{}", n.added.len()), "green"),
                self.color(&format!("-{}", n.removed.len()), "red"),
                self.color(&format!("~{}", n.modified.len()), "yellow"),
            ));
            lines.push(format!(
                "  flows: {} {} {}",
                self.color(&format!("+{}", f.added.len()), "green"),
                self.color(&format!("-{}", f.removed.len()), "red"),
                self.color(&format!("~{}", f.modified.len()), "yellow"),
            ));
            for node in &n.modified {
                for change in &node.changes {
                    lines.push(format!(
                        "    {}.{}: {} → {}",
                        node.name,
                        change.property_path,
                        change.before.as_deref().unwrap_or("∅"),
                        change.after.as_deref().unwrap_or("∅")
                    ));
                }
            }
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
