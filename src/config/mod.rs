//! Configuration module for blueprint-tools.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```
//! use blueprint_tools::config::{AppConfig, ConfigPreset, Validatable};
//!
//! let config = AppConfig::from_preset(ConfigPreset::Strict);
//! assert!(!config.comparator_config().content_hash_refinement);
//!
//! let config = AppConfig::builder().fail_on_conflict(true).build();
//! assert!(config.is_valid());
//! ```
//!
//! # Configuration File
//!
//! Place a `.blueprint-tools.yaml` file in your project root or
//! `~/.config/blueprint-tools/`:
//!
//! ```yaml
//! comparison:
//!   content_hash_refinement: false
//! behavior:
//!   fail_on_conflict: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    AnalysisConfig, AppConfig, AppConfigBuilder, BehaviorConfig, ComparisonConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    ConfigFileError, discover_config_file, generate_example_config, generate_full_example_config,
    load_config_file, load_or_default,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.blueprint-tools.yaml`.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_sections() {
        let schema = generate_json_schema().expect("schema");
        for section in ["analysis", "comparison", "output", "behavior"] {
            assert!(schema.contains(section), "missing {section}");
        }
    }
}
