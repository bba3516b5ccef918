//! Unified error types for blueprint-tools.
//!
//! Recoverable problems (a document that does not match any known shape, a
//! node that cannot be fully extracted, an unresolved reference) never reach
//! this hierarchy: they surface as diagnostics on the affected object or
//! comparison result. The variants here are reserved for failures that stop
//! an operation outright.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for blueprint-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BlueprintError {
    /// Errors while reading a package archive
    #[error("Failed to read package: {context}")]
    Archive {
        context: String,
        #[source]
        source: ArchiveErrorKind,
    },

    /// Errors during document parsing
    #[error("Failed to parse document: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors during object comparison
    #[error("Comparison failed: {context}")]
    Comparison {
        context: String,
        #[source]
        source: ComparisonErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Specific archive error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ArchiveErrorKind {
    #[error("not a ZIP archive or package directory")]
    NotAPackage,

    #[error("ZIP error: {0}")]
    Zip(String),

    #[error("archive has too many entries: {entries} (limit: {limit})")]
    TooManyEntries { entries: usize, limit: usize },
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },
}

/// Specific comparison error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ComparisonErrorKind {
    /// Caller contract violation: a pair must carry at least one object.
    #[error("both old and new objects are absent")]
    BothSidesMissing,
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for blueprint-tools operations
pub type Result<T> = std::result::Result<T, BlueprintError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl BlueprintError {
    /// Create an archive error with context
    pub fn archive(context: impl Into<String>, source: ArchiveErrorKind) -> Self {
        Self::Archive {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for missing field
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::parse(
            "missing required field",
            ParseErrorKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create a comparison error
    pub fn comparison(context: impl Into<String>, source: ComparisonErrorKind) -> Self {
        Self::Comparison {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Whether this error is the comparator's precondition violation.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::Comparison {
                source: ComparisonErrorKind::BothSidesMissing,
                ..
            }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for BlueprintError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<zip::result::ZipError> for BlueprintError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => e.into(),
            other => Self::archive("reading ZIP archive", ArchiveErrorKind::Zip(other.to_string())),
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so the
/// final message reads outermost-first:
///
/// ```ignore
/// use blueprint_tools::error::ErrorContext;
///
/// let archive = PackageArchive::open(path, &limits)
///     .with_context(|| format!("opening {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<BlueprintError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: BlueprintError, new_ctx: &str) -> BlueprintError {
    match err {
        BlueprintError::Archive {
            context: existing,
            source,
        } => BlueprintError::Archive {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BlueprintError::Parse {
            context: existing,
            source,
        } => BlueprintError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BlueprintError::Comparison {
            context: existing,
            source,
        } => BlueprintError::Comparison {
            context: chain_context(new_ctx, &existing),
            source,
        },
        BlueprintError::Io {
            path,
            message,
            source,
        } => BlueprintError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlueprintError::archive("old.zip", ArchiveErrorKind::NotAPackage);
        let display = err.to_string();
        assert!(display.contains("old.zip"), "unexpected message: {display}");

        let err = BlueprintError::missing_field("uuid", "processModel");
        let display = err.to_string();
        assert!(
            display.contains("missing") || display.contains("field"),
            "Error message should mention missing field: {display}"
        );
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = BlueprintError::io("/path/to/app.zip", io_err);

        assert!(err.to_string().contains("/path/to/app.zip"));
    }

    #[test]
    fn test_zip_error_becomes_archive_kind() {
        let err: BlueprintError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(
            err,
            BlueprintError::Archive {
                source: ArchiveErrorKind::Zip(_),
                ..
            }
        ));

        let io = zip::result::ZipError::Io(std::io::Error::other("disk"));
        assert!(matches!(BlueprintError::from(io), BlueprintError::Io { .. }));
    }

    #[test]
    fn test_contract_violation_flag() {
        let err = BlueprintError::comparison("pair", ComparisonErrorKind::BothSidesMissing);
        assert!(err.is_contract_violation());
        let other = BlueprintError::archive("app.zip", ArchiveErrorKind::NotAPackage);
        assert!(!other.is_contract_violation());
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(BlueprintError::parse(
                "base",
                ParseErrorKind::InvalidXml("eof".to_string()),
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(BlueprintError::Parse { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> =
            Err(BlueprintError::archive("app.zip", ArchiveErrorKind::NotAPackage));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
