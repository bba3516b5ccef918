//! Configuration types for blueprint-tools operations.

use crate::archive::ArchiveLimits;
use crate::content::DEFAULT_MAX_HASH_CHARS;
use crate::diff::{ComparatorConfig, RiskPolicy};
use crate::model::ObjectType;
use crate::parsers::DEFAULT_MAX_DEPTH;
use crate::reports::{ReportConfig, ReportFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Package analysis (parsing, hashing, limits)
    pub analysis: AnalysisConfig,
    /// Version comparison
    pub comparison: ComparisonConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Comparator settings derived from the analysis and comparison sections.
    #[must_use]
    pub const fn comparator_config(&self) -> ComparatorConfig {
        ComparatorConfig {
            content_hash_refinement: self.comparison.content_hash_refinement,
            max_hash_chars: self.analysis.max_hash_chars,
            parallel: self.analysis.parallel,
        }
    }

    #[must_use]
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            pretty: self.output.pretty,
            max_items: self.output.max_items,
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Enable or disable content-hash refinement.
    pub const fn content_hash_refinement(mut self, enabled: bool) -> Self {
        self.config.comparison.content_hash_refinement = enabled;
        self
    }

    /// Enable or disable parallel parsing and comparison.
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.analysis.parallel = parallel;
        self
    }

    /// Enable fail-on-conflict mode.
    pub const fn fail_on_conflict(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_conflict = fail;
        self
    }

    /// Enable fail-on-change mode.
    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section Types
// ============================================================================

/// Package analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Documents longer than this many characters are not content-hashed
    pub max_hash_chars: usize,
    /// Parse documents and compare objects on all cores
    pub parallel: bool,
    /// Maximum number of entries in a package
    pub max_archive_entries: usize,
    /// Maximum uncompressed size of one entry, in bytes
    pub max_entry_bytes: u64,
    /// Documents nesting elements deeper than this fail to parse
    pub max_nesting_depth: usize,
    /// Resolve references and pretty-print process-model expressions
    pub format_expressions: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let limits = ArchiveLimits::default();
        Self {
            max_hash_chars: DEFAULT_MAX_HASH_CHARS,
            parallel: true,
            max_archive_entries: limits.max_entries,
            max_entry_bytes: limits.max_entry_bytes,
            max_nesting_depth: DEFAULT_MAX_DEPTH,
            format_expressions: true,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub const fn archive_limits(&self) -> ArchiveLimits {
        ArchiveLimits {
            max_entries: self.max_archive_entries,
            max_entry_bytes: self.max_entry_bytes,
        }
    }
}

/// Version comparison configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Downgrade changes with identical content to NOT_CHANGED_NEW_VUUID
    pub content_hash_refinement: bool,
    /// Object types whose changes are flagged as high impact
    pub high_impact_types: Vec<String>,
    /// More removed objects than this is reported as a risk
    pub removed_risk_threshold: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        let policy = RiskPolicy::default();
        Self {
            content_hash_refinement: true,
            high_impact_types: policy
                .high_impact_types
                .iter()
                .map(ToString::to_string)
                .collect(),
            removed_risk_threshold: policy.removed_risk_threshold,
        }
    }
}

impl ComparisonConfig {
    #[must_use]
    pub fn risk_policy(&self) -> RiskPolicy {
        RiskPolicy {
            high_impact_types: self
                .high_impact_types
                .iter()
                .map(|t| ObjectType::from(t.clone()))
                .collect(),
            removed_risk_threshold: self.removed_risk_threshold,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Pretty-print JSON
    pub pretty: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Maximum items listed per section in summary output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Json,
            file: None,
            pretty: true,
            no_color: false,
            max_items: None,
        }
    }
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress non-essential output
    pub quiet: bool,
    /// Exit with code 2 if conflicts are detected
    pub fail_on_conflict: bool,
    /// Exit with code 1 if any changes are detected
    pub fail_on_change: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.max_hash_chars, 500_000);
        assert_eq!(config.analysis.archive_limits(), ArchiveLimits::default());
        assert_eq!(config.comparison.risk_policy(), RiskPolicy::default());
        assert_eq!(config.comparator_config(), ComparatorConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .content_hash_refinement(false)
            .fail_on_conflict(true)
            .output_format(ReportFormat::Summary)
            .build();
        assert!(!config.comparator_config().content_hash_refinement);
        assert!(config.behavior.fail_on_conflict);
        assert_eq!(config.output.format, ReportFormat::Summary);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: AppConfig =
            serde_yaml_ng::from_str("comparison:\n  removed_risk_threshold: 10\n").expect("yaml");
        assert_eq!(config.comparison.removed_risk_threshold, 10);
        assert!(config.comparison.content_hash_refinement);
        assert_eq!(config.comparison.high_impact_types.len(), 4);
    }
}
