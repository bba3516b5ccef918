//! Configuration validation.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AnalysisConfig, AppConfig, BehaviorConfig, ComparisonConfig, OutputConfig};
use crate::model::ObjectType;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.analysis.validate());
        errors.extend(self.comparison.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_hash_chars == 0 {
            errors.push(ConfigError {
                field: "analysis.max_hash_chars".to_string(),
                message: "Hash limit must be at least 1 character".to_string(),
            });
        }
        if self.max_archive_entries == 0 {
            errors.push(ConfigError {
                field: "analysis.max_archive_entries".to_string(),
                message: "Entry limit must be at least 1".to_string(),
            });
        }
        if self.max_entry_bytes == 0 {
            errors.push(ConfigError {
                field: "analysis.max_entry_bytes".to_string(),
                message: "Entry size limit must be at least 1 byte".to_string(),
            });
        }
        if self.max_nesting_depth == 0 {
            errors.push(ConfigError {
                field: "analysis.max_nesting_depth".to_string(),
                message: "Nesting limit must be at least 1 level".to_string(),
            });
        }
        errors
    }
}

impl Validatable for ComparisonConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.high_impact_types
            .iter()
            .filter(|tag| matches!(ObjectType::from((*tag).clone()), ObjectType::Other(_)))
            .map(|tag| ConfigError {
                field: "comparison.high_impact_types".to_string(),
                message: format!("Unknown object type '{tag}'"),
            })
            .collect()
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file
            && let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ConfigError {
                field: "output.file".to_string(),
                message: format!("Parent directory does not exist: {}", parent.display()),
            });
        }

        if self.max_items == Some(0) {
            errors.push(ConfigError {
                field: "output.max_items".to_string(),
                message: "Item limit must be at least 1 when set".to_string(),
            });
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = AppConfig::default();
        config.analysis.max_hash_chars = 0;
        config.analysis.max_entry_bytes = 0;
        config.analysis.max_nesting_depth = 0;
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "analysis.max_hash_chars",
                "analysis.max_entry_bytes",
                "analysis.max_nesting_depth"
            ]
        );
    }

    #[test]
    fn test_unknown_high_impact_type() {
        let mut config = ComparisonConfig::default();
        config.high_impact_types.push("Widget".to_string());
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Widget"));
    }

    #[test]
    fn test_output_parent_must_exist() {
        let output = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/report.json")),
            ..OutputConfig::default()
        };
        assert!(!output.is_valid());
    }
}
