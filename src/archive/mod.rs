//! Package archive reader.
//!
//! A package is either a ZIP file or an already-extracted directory. Only
//! XML documents under a known object-kind directory are read; everything
//! else is skipped. Entries that are not valid UTF-8 or that exceed the
//! per-entry size limit are skipped with a warning rather than failing the
//! scan.

use crate::error::{ArchiveErrorKind, BlueprintError, ErrorContext, Result};
use crate::parsers::is_known_document;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use walkdir::WalkDir;
use zip::ZipArchive;
use zip::result::ZipError;

/// Size and entry-count limits applied while reading a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveLimits {
    pub max_entries: usize,
    pub max_entry_bytes: u64,
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self {
            max_entries: 20_000,
            max_entry_bytes: 64 * 1024 * 1024,
        }
    }
}

/// One document read from a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Forward-slash path relative to the package root
    pub path: String,
    pub content: String,
}

/// Documents of one package, in archive order.
#[derive(Debug, Clone, Default)]
pub struct PackageArchive {
    name: String,
    entries: Vec<ArchiveEntry>,
    skipped: usize,
}

fn decode(path: &str, bytes: Vec<u8>) -> Option<String> {
    match String::from_utf8(bytes) {
        Ok(mut text) => {
            if text.starts_with('\u{feff}') {
                text.remove(0);
            }
            Some(text)
        }
        Err(err) => {
            tracing::warn!(path, error = %err.utf8_error(), "skipping entry that is not UTF-8");
            None
        }
    }
}

fn over_limit(path: &str, size: u64, limits: &ArchiveLimits) -> bool {
    let over = size > limits.max_entry_bytes;
    if over {
        tracing::warn!(
            path,
            size,
            limit = limits.max_entry_bytes,
            "skipping entry over the size limit"
        );
    }
    over
}

impl PackageArchive {
    /// Open a ZIP file or a directory.
    pub fn open(path: &Path, limits: &ArchiveLimits) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let archive = if path.is_dir() {
            Self::from_directory(path, limits)
        } else if path.is_file() {
            Self::from_zip(path, limits)
        } else {
            Err(BlueprintError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "package not found"),
            ))
        }
        .with_context(|| format!("opening package {}", path.display()))?;

        let archive = Self { name, ..archive };
        tracing::info!(
            package = %archive.name,
            documents = archive.entries.len(),
            skipped = archive.skipped,
            "package read"
        );
        Ok(archive)
    }

    /// Build from in-memory entries, keeping only known documents.
    pub fn from_entries(name: impl Into<String>, entries: Vec<ArchiveEntry>) -> Self {
        let total = entries.len();
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|e| is_known_document(&e.path))
            .collect();
        Self {
            name: name.into(),
            skipped: total - entries.len(),
            entries,
        }
    }

    fn from_zip(path: &Path, limits: &ArchiveLimits) -> Result<Self> {
        let file = File::open(path).map_err(|e| BlueprintError::io(path, e))?;
        let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|err| match err {
            ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) => {
                BlueprintError::archive("reading ZIP archive", ArchiveErrorKind::NotAPackage)
            }
            other => other.into(),
        })?;

        if zip.len() > limits.max_entries {
            return Err(BlueprintError::archive(
                "reading ZIP archive",
                ArchiveErrorKind::TooManyEntries {
                    entries: zip.len(),
                    limit: limits.max_entries,
                },
            ));
        }

        let mut archive = Self::default();
        for index in 0..zip.len() {
            let mut file = zip.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let entry_path = file.name().replace('\\', "/");
            if !is_known_document(&entry_path) {
                archive.skipped += 1;
                continue;
            }
            if over_limit(&entry_path, file.size(), limits) {
                archive.skipped += 1;
                continue;
            }
            let capacity = usize::try_from(file.size()).unwrap_or_default();
            let mut bytes = Vec::with_capacity(capacity);
            // The declared size may understate the data, so cap the read too
            file.by_ref()
                .take(limits.max_entry_bytes.saturating_add(1))
                .read_to_end(&mut bytes)
                .map_err(|e| BlueprintError::io(path, e))
                .with_context(|| format!("reading entry {entry_path}"))?;
            if over_limit(&entry_path, bytes.len() as u64, limits) {
                archive.skipped += 1;
                continue;
            }
            match decode(&entry_path, bytes) {
                Some(content) => archive.entries.push(ArchiveEntry {
                    path: entry_path,
                    content,
                }),
                None => archive.skipped += 1,
            }
        }
        Ok(archive)
    }

    fn from_directory(root: &Path, limits: &ArchiveLimits) -> Result<Self> {
        let mut archive = Self::default();
        let mut seen = 0usize;
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                BlueprintError::io(path, std::io::Error::other(e.to_string()))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            seen += 1;
            if seen > limits.max_entries {
                return Err(BlueprintError::archive(
                    "reading package directory",
                    ArchiveErrorKind::TooManyEntries {
                        entries: seen,
                        limit: limits.max_entries,
                    },
                ));
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let entry_path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if !is_known_document(&entry_path) {
                archive.skipped += 1;
                continue;
            }
            let size = entry
                .metadata()
                .map_err(|e| BlueprintError::io(entry.path(), std::io::Error::other(e.to_string())))?
                .len();
            if over_limit(&entry_path, size, limits) {
                archive.skipped += 1;
                continue;
            }
            let bytes = std::fs::read(entry.path()).map_err(|e| BlueprintError::io(entry.path(), e))?;
            match decode(&entry_path, bytes) {
                Some(content) => archive.entries.push(ArchiveEntry {
                    path: entry_path,
                    content,
                }),
                None => archive.skipped += 1,
            }
        }
        Ok(archive)
    }

    /// Package file or directory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ignored as non-documents or undecodable.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
        let file = File::create(path).expect("create");
        let mut zip = zip::ZipWriter::new(file);
        for (name, body) in files {
            zip.start_file(*name, SimpleFileOptions::default()).expect("start");
            zip.write_all(body).expect("write");
        }
        zip.finish().expect("finish");
    }

    #[test]
    fn test_zip_filters_and_decodes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("app.zip");
        write_zip(
            &path,
            &[
                ("META-INF/MANIFEST.MF", &b"x"[..]),
                ("content/_a-1.xml", "\u{feff}<contentHaul/>".as_bytes()),
                ("content/_a-2.xml", &[0xff, 0xfe, 0x00][..]),
                ("processModel/pm.xml", &b"<processModelHaul/>"[..]),
                ("readme.xml", &b"<x/>"[..]),
            ],
        );

        let archive = PackageArchive::open(&path, &ArchiveLimits::default()).expect("open");
        assert_eq!(archive.name(), "app.zip");
        let paths: Vec<_> = archive.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["content/_a-1.xml", "processModel/pm.xml"]);
        assert_eq!(archive.entries()[0].content, "<contentHaul/>");
        assert_eq!(archive.skipped(), 3);
    }

    #[test]
    fn test_limits_are_enforced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("big.zip");
        write_zip(
            &path,
            &[
                ("content/a.xml", &b"<a>0123456789</a>"[..]),
                ("content/b.xml", &b"<b/>"[..]),
            ],
        );

        let few = ArchiveLimits {
            max_entries: 1,
            ..ArchiveLimits::default()
        };
        let err = PackageArchive::open(&path, &few).unwrap_err();
        assert!(err.to_string().contains("opening package"));
        assert!(matches!(
            err,
            BlueprintError::Archive {
                source: ArchiveErrorKind::TooManyEntries { entries: 2, limit: 1 },
                ..
            }
        ));

        let small = ArchiveLimits {
            max_entry_bytes: 4,
            ..ArchiveLimits::default()
        };
        let archive = PackageArchive::open(&path, &small).expect("open");
        let paths: Vec<_> = archive.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["content/b.xml"]);
        assert_eq!(archive.skipped(), 1);
    }

    #[test]
    fn test_directory_skips_oversize_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("content")).expect("mkdir");
        std::fs::write(dir.path().join("content/big.xml"), "<contentHaul>0123456789</contentHaul>")
            .expect("write");
        std::fs::write(dir.path().join("content/small.xml"), "<c/>").expect("write");
        std::fs::write(dir.path().join("notes.txt"), "x").expect("write");

        let limits = ArchiveLimits {
            max_entry_bytes: 8,
            ..ArchiveLimits::default()
        };
        let archive = PackageArchive::open(dir.path(), &limits).expect("open");
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.entries()[0].path, "content/small.xml");
        assert_eq!(archive.skipped(), 2);
    }

    #[test]
    fn test_not_a_zip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.zip");
        std::fs::write(&path, b"not a zip").expect("write");
        let err = PackageArchive::open(&path, &ArchiveLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            BlueprintError::Archive {
                source: ArchiveErrorKind::NotAPackage,
                ..
            }
        ));
    }

    #[test]
    fn test_directory_package() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("group")).expect("mkdir");
        std::fs::write(dir.path().join("group/g.xml"), "<groupHaul/>").expect("write");
        std::fs::write(dir.path().join("notes.txt"), "x").expect("write");

        let archive = PackageArchive::open(dir.path(), &ArchiveLimits::default()).expect("open");
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.entries()[0].path, "group/g.xml");
        assert_eq!(archive.skipped(), 1);
    }

    #[test]
    fn test_missing_package() {
        let err = PackageArchive::open(Path::new("/nonexistent/app.zip"), &ArchiveLimits::default())
            .unwrap_err();
        assert!(matches!(err, BlueprintError::Io { .. }));
    }
}
