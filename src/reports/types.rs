//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Structured JSON (external schema for comparisons)
    #[default]
    Json,
    /// Brief plain-text summary
    Summary,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Pretty-print structured output
    pub pretty: bool,
    /// Maximum items listed per section in text output
    pub max_items: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            max_items: None,
        }
    }
}

impl ReportConfig {
    pub(crate) fn limit(&self, len: usize) -> usize {
        self.max_items.map_or(len, |max| max.min(len))
    }
}
