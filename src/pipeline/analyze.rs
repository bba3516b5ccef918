//! Package analysis stage: archive → object directory → blueprint.
//!
//! Pass 1 parses every document and fills the directory. Pass 2 rebuilds
//! process models against the completed directory, after which record and
//! site references are resolved to display names. Diff hashes are
//! precomputed last so comparisons never re-normalize a document.

use super::AnalysisContext;
use crate::archive::PackageArchive;
use crate::config::AppConfig;
use crate::content::{DiffHash, DiffHasher};
use crate::model::{AppObject, Blueprint, ObjectDirectory, ProcessModelObject};
use crate::parsers::{Document, ParseError, XmlElement, parse_document_with_depth};
use crate::process::ProcessEnhancer;
use anyhow::{Context, Result};
use chrono::Utc;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Counters collected while analyzing one package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Archive entries that were not package documents
    pub skipped_entries: usize,
    /// Documents with unreadable markup
    pub parse_failures: usize,
    /// Documents no parser recognised
    pub unrecognised: usize,
    /// Objects the directory refused
    pub rejected: usize,
    pub process_models_enhanced: usize,
    /// Record and site references to objects outside the package
    pub unresolved_references: usize,
}

/// Result of analyzing one package.
#[derive(Debug, Clone)]
pub struct PackageAnalysis {
    pub directory: ObjectDirectory,
    pub blueprint: Blueprint,
    pub stats: AnalysisStats,
}

/// Open and analyze a package file or directory.
pub fn analyze_path(
    path: &Path,
    config: &AppConfig,
    ctx: &AnalysisContext,
) -> Result<PackageAnalysis> {
    let _span = ctx.span("analyze").entered();
    let archive = PackageArchive::open(path, &config.analysis.archive_limits())
        .with_context(|| format!("Failed to read package: {}", path.display()))?;
    Ok(analyze_archive(&archive, config))
}

/// Analyze an already-read package.
///
/// Per-document failures are isolated: they are logged and counted, never
/// returned.
#[must_use]
pub fn analyze_archive(archive: &PackageArchive, config: &AppConfig) -> PackageAnalysis {
    let parallel = config.analysis.parallel;
    let mut stats = AnalysisStats {
        skipped_entries: archive.skipped(),
        ..AnalysisStats::default()
    };

    // Pass 1: fan-out parse, fan-in in archive order
    let max_depth = config.analysis.max_nesting_depth;
    let parse = |entry: &crate::archive::ArchiveEntry| {
        parse_document_with_depth(&entry.path, &entry.content, max_depth)
    };
    let parsed: Vec<Result<Option<AppObject>, ParseError>> = if parallel {
        archive.entries().par_iter().map(parse).collect()
    } else {
        archive.entries().iter().map(parse).collect()
    };

    let mut directory = ObjectDirectory::new();
    let mut process_sources: IndexMap<String, usize> = IndexMap::new();
    for (idx, outcome) in parsed.into_iter().enumerate() {
        let path = &archive.entries()[idx].path;
        let object = match outcome {
            Ok(Some(object)) => object,
            Ok(None) => {
                stats.unrecognised += 1;
                continue;
            }
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "skipping unreadable document");
                stats.parse_failures += 1;
                continue;
            }
        };
        let process_uuid = matches!(object, AppObject::ProcessModel(_))
            .then(|| object.uuid().trim().to_string());
        match directory.add(object) {
            Ok(_) => {
                if let Some(uuid) = process_uuid {
                    process_sources.insert(uuid, idx);
                }
            }
            Err(rejection) => {
                tracing::debug!(path = %path, reason = %rejection, "object not admitted");
                stats.rejected += 1;
            }
        }
    }
    tracing::info!(
        package = archive.name(),
        objects = directory.len(),
        rejected = stats.rejected,
        failures = stats.parse_failures,
        "first pass complete"
    );

    // Pass 2: needs the complete directory
    let enhanced = enhance_process_models(archive, &directory, &process_sources, config);
    stats.process_models_enhanced = enhanced.len();
    for model in enhanced {
        directory.replace(AppObject::ProcessModel(model));
    }

    stats.unresolved_references = resolve_references(&mut directory);
    precompute_hashes(&mut directory, config);

    let blueprint = Blueprint::from_directory(archive.name(), &directory, Utc::now());
    tracing::info!(
        package = archive.name(),
        objects = blueprint.metadata.total_objects,
        complexity = %blueprint.summary.complexity,
        process_models = stats.process_models_enhanced,
        "package analyzed"
    );

    PackageAnalysis {
        directory,
        blueprint,
        stats,
    }
}

fn enhance_process_models(
    archive: &PackageArchive,
    directory: &ObjectDirectory,
    sources: &IndexMap<String, usize>,
    config: &AppConfig,
) -> Vec<ProcessModelObject> {
    let enhancer =
        ProcessEnhancer::new(directory).format_expressions(config.analysis.format_expressions);
    let enhance = |(uuid, idx): (&String, &usize)| -> Option<ProcessModelObject> {
        let AppObject::ProcessModel(base) = directory.get(uuid)?.as_ref() else {
            return None;
        };
        let entry = archive.entries().get(*idx)?;
        let root = match XmlElement::parse_document_with_depth(
            &entry.content,
            config.analysis.max_nesting_depth,
        ) {
            Ok(root) => root,
            Err(err) => {
                tracing::warn!(path = %entry.path, error = %err, "process model not re-read");
                return None;
            }
        };
        let document = Document {
            path: &entry.path,
            raw: &entry.content,
            root: &root,
        };
        Some(enhancer.enhance(&document, base))
    };

    let pending: Vec<(&String, &usize)> = sources.iter().collect();
    if config.analysis.parallel {
        pending.into_par_iter().filter_map(enhance).collect()
    } else {
        pending.into_iter().filter_map(enhance).collect()
    }
}

/// Fill in target names on record types and sites.
///
/// Returns the number of references whose target is not in the directory.
fn resolve_references(directory: &mut ObjectDirectory) -> usize {
    let referencing: Vec<Arc<AppObject>> = directory
        .objects()
        .filter(|o| matches!(o.as_ref(), AppObject::RecordType(_) | AppObject::Site(_)))
        .cloned()
        .collect();

    let mut unresolved = 0;
    for shared in referencing {
        let mut object = AppObject::clone(&shared);
        unresolved += link_references(&mut object, directory);
        directory.replace(object);
    }
    if unresolved > 0 {
        tracing::info!(unresolved, "references to objects outside the package");
    }
    unresolved
}

fn link_references(object: &mut AppObject, directory: &ObjectDirectory) -> usize {
    let mut dangling: Vec<String> = Vec::new();
    let mut lookup = |uuid: &str, role: &str| -> Option<String> {
        let uuid = uuid.trim();
        if uuid.is_empty() {
            return None;
        }
        if directory.contains(uuid) {
            return Some(directory.resolve(uuid));
        }
        dangling.push(format!("unresolved {role} {uuid}"));
        None
    };

    match object {
        AppObject::RecordType(record) => {
            for relationship in &mut record.relationships {
                relationship.target_record_name =
                    lookup(&relationship.target_record_uuid, "relationship target");
            }
            for action in &mut record.actions {
                action.target_process_name = lookup(&action.target_process_uuid, "action process");
            }
        }
        AppObject::Site(site) => {
            for page in &mut site.pages {
                page.ui_object_names = page
                    .ui_objects
                    .iter()
                    .map(|uuid| lookup(uuid, "page object"))
                    .collect();
            }
        }
        AppObject::ProcessModel(_) | AppObject::Simple(_) => {}
    }

    let count = dangling.len();
    if count > 0 {
        tracing::debug!(uuid = object.uuid(), count, "unresolved references");
        object.core_mut().diagnostics.extend(dangling);
    }
    count
}

fn precompute_hashes(directory: &mut ObjectDirectory, config: &AppConfig) {
    let hasher = DiffHasher::new(config.analysis.max_hash_chars);
    let hash = |object: &Arc<AppObject>| -> Option<(String, DiffHash)> {
        let raw = &object.core().raw_document;
        (!raw.trim().is_empty()).then(|| (object.uuid().to_string(), hasher.hash(raw)))
    };

    let objects: Vec<&Arc<AppObject>> = directory.objects().collect();
    let hashes: Vec<(String, DiffHash)> = if config.analysis.parallel {
        objects.into_par_iter().filter_map(hash).collect()
    } else {
        objects.into_iter().filter_map(hash).collect()
    };

    let unavailable = hashes.iter().filter(|(_, h)| !h.is_available()).count();
    for (uuid, hash) in hashes {
        if let Some(entry) = directory.entry_mut(&uuid) {
            Arc::make_mut(&mut entry.object).core_mut().diff_hash = Some(hash);
        }
    }
    if unavailable > 0 {
        tracing::info!(unavailable, "documents over the hash cap");
    }
}
