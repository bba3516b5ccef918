//! **Blueprint extraction and semantic version diff for low-code application packages.**
//!
//! `blueprint-tools` reads an exported application package (a ZIP of XML
//! documents, one per design object), turns it into a structured
//! [`Blueprint`], and compares two or three versions of a package to tell
//! which objects really changed.
//!
//! ## Key Features
//!
//! - **Two-pass extraction**: every document is parsed into an object and
//!   registered in an [`ObjectDirectory`]; process models are then rebuilt
//!   against the complete directory so node references resolve to names.
//! - **Dual-layer comparison**: version identifiers and version history
//!   classify each object, and a content hash over the normalized document
//!   separates real edits from version-only bumps.
//! - **Process-flow graphs**: nodes, flows, start/end nodes and per-node
//!   connectivity, plus node-level and flow-level diffs between versions.
//! - **Three-way merge classification**: base, customer and vendor packages
//!   are compared to flag conflicting customizations.
//! - **Reporting**: JSON (external report schema) and a compact text summary.
//!
//! ## Core Concepts & Modules
//!
//! - **[`archive`]**: package reader for ZIP files and extracted directories.
//! - **[`parsers`]**: per-kind document parsers and the version-history extractor.
//! - **[`model`]**: object model, [`ObjectDirectory`] and [`Blueprint`].
//! - **[`process`]**: process-model node and flow extraction.
//! - **[`content`]**: document normalization and diff hashes.
//! - **[`diff`]**: [`DualLayerComparator`], comparison reports, node/flow and
//!   three-way comparison.
//! - **[`reports`]**: report generators.
//! - **[`pipeline`]**: end-to-end stages used by the CLI.
//!
//! ## Getting Started
//!
//! ```
//! use blueprint_tools::archive::{ArchiveEntry, PackageArchive};
//! use blueprint_tools::config::AppConfig;
//! use blueprint_tools::pipeline::analyze_archive;
//!
//! let package = PackageArchive::from_entries(
//!     "app.zip",
//!     vec![ArchiveEntry {
//!         path: "content/c-1.xml".to_string(),
//!         content: r#"<contentHaul><constant name="MAX" uuid="c-1"/></contentHaul>"#.to_string(),
//!     }],
//! );
//! let analysis = analyze_archive(&package, &AppConfig::default());
//! assert_eq!(analysis.blueprint.metadata.total_objects, 1);
//! assert_eq!(analysis.directory.resolve("c-1"), "MAX");
//! ```
//!
//! Packages on disk go through [`pipeline::analyze_path`] and
//! [`pipeline::compare_paths`]:
//!
//! ```no_run
//! use std::path::Path;
//! use blueprint_tools::config::AppConfig;
//! use blueprint_tools::pipeline::{AnalysisContext, compare_paths};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     let cmp = compare_paths(
//!         Path::new("app-v1.zip"),
//!         Path::new("app-v2.zip"),
//!         &config,
//!         &AnalysisContext::new(),
//!     )?;
//!     println!("{} changes, impact {}", cmp.report.total_changes, cmp.report.impact_level);
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod archive;
pub mod cli;
pub mod config;
pub mod content;
pub mod diff;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod process;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset};
pub use config::{ConfigError, Validatable};
pub use diff::{
    ChangeStatus, ComparisonReport, ComparisonResult, DualLayerComparator, ThreeWayComparator,
};
pub use error::{BlueprintError, ErrorContext, Result};
pub use model::{AppObject, Blueprint, ObjectDirectory, ObjectType};
pub use parsers::parse_document;
pub use reports::{ReportFormat, ReportGenerator};
