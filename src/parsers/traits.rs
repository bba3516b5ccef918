//! Parser trait definitions and error types.
//!
//! This module defines the `ObjectParser` trait implemented once per
//! document shape. A parser that does not recognise a document returns
//! `None`; only markup that cannot be read at all is an error.

use super::markup::XmlElement;
use crate::model::AppObject;
use thiserror::Error;

/// Errors that can occur while reading a package document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("XML parse error: {0}")]
    XmlError(String),

    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Element nesting exceeds {0} levels")]
    TooDeep(usize),
}

impl From<ParseError> for crate::error::BlueprintError {
    fn from(err: ParseError) -> Self {
        use crate::error::ParseErrorKind;
        match err {
            ParseError::XmlError(msg) | ParseError::InvalidStructure(msg) => {
                Self::parse("document", ParseErrorKind::InvalidXml(msg))
            }
            ParseError::MissingField(field) => Self::missing_field(field, "document"),
            too_deep @ ParseError::TooDeep(_) => {
                Self::parse("document", ParseErrorKind::InvalidXml(too_deep.to_string()))
            }
        }
    }
}

/// A document as handed to the object parsers.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    /// Archive-relative path
    pub path: &'a str,
    /// Complete original text
    pub raw: &'a str,
    /// Parsed element tree
    pub root: &'a XmlElement,
}

/// Trait for per-kind object parsers
///
/// `can_handle` is a cheap path predicate; `parse` inspects the document's
/// top-level shape and returns `None` on any structural mismatch so one
/// unexpected document never aborts a package scan.
pub trait ObjectParser {
    /// Human-readable parser name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether this parser is responsible for documents at `path`
    fn can_handle(&self, path: &str) -> bool;

    /// Extract an object from the document, or `None` when the shape does not match
    fn parse(&self, document: &Document<'_>) -> Option<AppObject>;
}

/// Whether an archive path lies under the given top-level kind directory.
///
/// Matches `site/x.xml` as well as nested layouts such as
/// `export/site/x.xml`.
#[must_use]
pub fn path_in_dir(path: &str, dir: &str) -> bool {
    let normalized = path.replace('\\', "/");
    normalized
        .split('/')
        .rev()
        .skip(1)
        .any(|segment| segment == dir)
}
