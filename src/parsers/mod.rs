//! Package document parsers.
//!
//! Each object kind has its own parser behind the [`ObjectParser`] trait.
//! Documents are routed by archive path through the closed [`ParserKind`]
//! enum (first match wins), and every parser checks the document's
//! top-level shape before extracting anything.
//!
//! ## Usage
//!
//! ```
//! use blueprint_tools::parsers::parse_document;
//!
//! let xml = r#"<contentHaul><constant name="MAX" uuid="c-1"><typedValue><value>10</value></typedValue></constant></contentHaul>"#;
//! let object = parse_document("content/c-1.xml", xml).unwrap().unwrap();
//! assert_eq!(object.name(), "MAX");
//! ```

mod common;
mod content;
mod detection;
mod history;
mod markup;
mod process_model;
mod record_type;
mod simple;
mod site;
mod traits;

pub use content::ContentParser;
pub use detection::{ParserKind, is_known_document};
pub use history::{extract_lineage, parse_timestamp};
pub use markup::{DEFAULT_MAX_DEPTH, Descendants, XmlElement, local_name};
pub use process_model::{ProcessModelParser, process_model_element, process_variables};
pub use record_type::RecordTypeParser;
pub use simple::{SimpleParser, SimpleShape};
pub use site::SiteParser;
pub use traits::{Document, ObjectParser, ParseError, path_in_dir};

use crate::model::AppObject;

/// Parse one package document into an object.
///
/// Returns `Ok(None)` when no parser is responsible for the path or the
/// document does not have the expected shape. Markup that cannot be read
/// at all, or that nests deeper than [`DEFAULT_MAX_DEPTH`], is an error.
pub fn parse_document(path: &str, raw: &str) -> Result<Option<AppObject>, ParseError> {
    parse_document_with_depth(path, raw, DEFAULT_MAX_DEPTH)
}

/// [`parse_document`] with an explicit element nesting limit.
pub fn parse_document_with_depth(
    path: &str,
    raw: &str,
    max_depth: usize,
) -> Result<Option<AppObject>, ParseError> {
    let Some(kind) = ParserKind::for_path(path) else {
        tracing::debug!(path, "no parser for document");
        return Ok(None);
    };

    let root = XmlElement::parse_document_with_depth(raw, max_depth)?;
    let document = Document {
        path,
        raw,
        root: &root,
    };
    let object = kind.parse(&document);
    if object.is_none() {
        tracing::debug!(path, parser = kind.name(), "document shape not recognised");
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_routes_by_path() {
        let xml = r#"<groupHaul><group uuid="g-1" name="Admins"/></groupHaul>"#;
        let object = parse_document("group/g-1.xml", xml)
            .expect("parse")
            .expect("object");
        assert_eq!(object.name(), "Admins");

        // Same document under the wrong directory is a shape mismatch
        assert!(parse_document("content/g-1.xml", xml).expect("parse").is_none());
        assert!(parse_document("other/g-1.xml", xml).expect("parse").is_none());
    }

    #[test]
    fn test_malformed_markup_is_error() {
        assert!(parse_document("content/x.xml", "<contentHaul><rule>").is_err());
    }

    #[test]
    fn test_depth_limit_applies_to_known_documents() {
        let xml = r#"<groupHaul><group uuid="g-1" name="Admins"/></groupHaul>"#;
        assert_eq!(
            parse_document_with_depth("group/g-1.xml", xml, 1),
            Err(ParseError::TooDeep(1))
        );
        assert!(parse_document_with_depth("group/g-1.xml", xml, 2)
            .expect("parse")
            .is_some());
    }
}
