//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".blueprint-tools.yaml",
    ".blueprint-tools.yml",
    "blueprint-tools.yaml",
    "blueprint-tools.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/blueprint-tools/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path
        && path.exists()
    {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    if let Some(git_root) = find_git_root()
        && let Some(path) = find_config_in_dir(&git_root)
    {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir()
        && let Some(path) = find_config_in_dir(&config_dir.join("blueprint-tools"))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml_ng::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml_ng::Error> for ConfigFileError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml_ng::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults are taken from `other`, so
    /// CLI args that were never set leave file settings in place.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Analysis config
        if other.analysis.max_hash_chars != defaults.analysis.max_hash_chars {
            self.analysis.max_hash_chars = other.analysis.max_hash_chars;
        }
        if !other.analysis.parallel {
            self.analysis.parallel = false;
        }
        if other.analysis.max_archive_entries != defaults.analysis.max_archive_entries {
            self.analysis.max_archive_entries = other.analysis.max_archive_entries;
        }
        if other.analysis.max_entry_bytes != defaults.analysis.max_entry_bytes {
            self.analysis.max_entry_bytes = other.analysis.max_entry_bytes;
        }
        if other.analysis.max_nesting_depth != defaults.analysis.max_nesting_depth {
            self.analysis.max_nesting_depth = other.analysis.max_nesting_depth;
        }
        if !other.analysis.format_expressions {
            self.analysis.format_expressions = false;
        }

        // Comparison config
        if !other.comparison.content_hash_refinement {
            self.comparison.content_hash_refinement = false;
        }
        if other.comparison.high_impact_types != defaults.comparison.high_impact_types {
            self.comparison
                .high_impact_types
                .clone_from(&other.comparison.high_impact_types);
        }
        if other.comparison.removed_risk_threshold != defaults.comparison.removed_risk_threshold {
            self.comparison.removed_risk_threshold = other.comparison.removed_risk_threshold;
        }

        // Output config - only override if explicitly set
        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if !other.output.pretty {
            self.output.pretty = false;
        }
        if other.output.no_color {
            self.output.no_color = true;
        }
        if other.output.max_items.is_some() {
            self.output.max_items = other.output.max_items;
        }

        // Behavior config (booleans - if set to true, override)
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if other.behavior.fail_on_conflict {
            self.behavior.fail_on_conflict = true;
        }
        if other.behavior.fail_on_change {
            self.behavior.fail_on_change = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# blueprint-tools configuration
# Place this file at .blueprint-tools.yaml in your project root or ~/.config/blueprint-tools/

{}
",
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# blueprint-tools Configuration File
# ==================================
#
# Place it at:
#   - .blueprint-tools.yaml in your project root
#   - ~/.config/blueprint-tools/blueprint-tools.yaml for global config
#
# CLI arguments always override file settings.

# Package analysis
analysis:
  # Documents longer than this are not content-hashed
  max_hash_chars: 500000
  # Parse and compare on all cores
  parallel: true
  # Reject packages with more entries than this
  max_archive_entries: 20000
  # Skip entries larger than this many bytes
  max_entry_bytes: 67108864
  # Documents nested deeper than this many elements are skipped
  max_nesting_depth: 256
  # Resolve references in process-model expressions
  format_expressions: true

# Version comparison
comparison:
  # Downgrade version-only changes when content is identical
  content_hash_refinement: true
  # Changes to these kinds are flagged as high impact
  high_impact_types:
    - Process Model
    - Record Type
    - Integration
    - Connected System
  # More removed objects than this requires review
  removed_risk_threshold: 5

# Output configuration
output:
  # Format: json, summary
  format: json
  # Output file path (omit for stdout)
  # file: report.json
  pretty: true
  # Disable colored output
  no_color: false
  # Limit items per section in summary output
  # max_items: 50

# Behavior flags
behavior:
  # Suppress non-essential output
  quiet: false
  # Exit with code 2 if conflicts are detected
  fail_on_conflict: false
  # Exit with code 1 if any changes are detected
  fail_on_change: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
