//! Named configuration presets.

use super::types::AppConfig;
use crate::reports::ReportFormat;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default settings suitable for most packages
    Default,
    /// Report every version bump as a change, no content-hash refinement
    Strict,
    /// Skip expression formatting for faster analysis of large packages
    Fast,
    /// Machine-readable output, fail on conflicts
    CiCd,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Fast => "fast",
            Self::CiCd => "ci-cd",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "strict" | "exact" => Some(Self::Strict),
            "fast" | "quick" => Some(Self::Fast),
            "ci-cd" | "ci" | "pipeline" => Some(Self::CiCd),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Dual-layer comparison with content-hash refinement",
            Self::Strict => "Version identifiers only, every bump counts as a change",
            Self::Fast => "Raw process-model expressions, no reference resolution",
            Self::CiCd => "Compact JSON output that fails the build on conflicts",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Fast, Self::CiCd]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        let mut config = Self::default();
        match preset {
            ConfigPreset::Default => {}
            ConfigPreset::Strict => config.comparison.content_hash_refinement = false,
            ConfigPreset::Fast => config.analysis.format_expressions = false,
            ConfigPreset::CiCd => {
                config.output.format = ReportFormat::Json;
                config.output.pretty = false;
                config.output.no_color = true;
                config.behavior.quiet = true;
                config.behavior.fail_on_conflict = true;
            }
        }
        config
    }
}
