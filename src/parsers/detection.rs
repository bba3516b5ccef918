//! Parser selection for package documents.
//!
//! Parser kinds form a closed enum checked in a fixed order; the first kind
//! whose path predicate matches owns the document.

use super::content::ContentParser;
use super::process_model::ProcessModelParser;
use super::record_type::RecordTypeParser;
use super::simple::{self, SimpleParser};
use super::site::SiteParser;
use super::traits::{Document, ObjectParser};
use crate::model::AppObject;

/// Parser type selected for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserKind {
    Site,
    RecordType,
    ProcessModel,
    Content,
    Group,
    ConnectedSystem,
    WebApi,
    Report,
    DataType,
}

impl ParserKind {
    /// Dispatch order.
    pub const ALL: [Self; 9] = [
        Self::Site,
        Self::RecordType,
        Self::ProcessModel,
        Self::Content,
        Self::Group,
        Self::ConnectedSystem,
        Self::WebApi,
        Self::Report,
        Self::DataType,
    ];

    /// Get the human-readable name for this parser.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::RecordType => "record type",
            Self::ProcessModel => "process model",
            Self::Content => "content",
            Self::Group => "group",
            Self::ConnectedSystem => "connected system",
            Self::WebApi => "web API",
            Self::Report => "report",
            Self::DataType => "data type",
        }
    }

    /// Top-level package directory holding documents of this kind.
    #[must_use]
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::RecordType => "recordType",
            Self::ProcessModel => "processModel",
            Self::Content => "content",
            Self::Group => simple::GROUP.directory,
            Self::ConnectedSystem => simple::CONNECTED_SYSTEM.directory,
            Self::WebApi => simple::WEB_API.directory,
            Self::Report => simple::REPORT.directory,
            Self::DataType => simple::DATA_TYPE.directory,
        }
    }

    /// First parser kind responsible for `path`.
    #[must_use]
    pub fn for_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.can_handle(path))
    }

    #[must_use]
    pub fn can_handle(&self, path: &str) -> bool {
        match self {
            Self::Site => SiteParser.can_handle(path),
            Self::RecordType => RecordTypeParser.can_handle(path),
            Self::ProcessModel => ProcessModelParser.can_handle(path),
            Self::Content => ContentParser.can_handle(path),
            Self::Group
            | Self::ConnectedSystem
            | Self::WebApi
            | Self::Report
            | Self::DataType => super::traits::path_in_dir(path, self.directory()),
        }
    }

    /// Run this kind's parser.
    #[must_use]
    pub fn parse(&self, document: &Document<'_>) -> Option<AppObject> {
        match self {
            Self::Site => SiteParser.parse(document),
            Self::RecordType => RecordTypeParser.parse(document),
            Self::ProcessModel => ProcessModelParser.parse(document),
            Self::Content => ContentParser.parse(document),
            Self::Group => SimpleParser::new(simple::GROUP).parse(document),
            Self::ConnectedSystem => SimpleParser::new(simple::CONNECTED_SYSTEM).parse(document),
            Self::WebApi => SimpleParser::new(simple::WEB_API).parse(document),
            Self::Report => SimpleParser::new(simple::REPORT).parse(document),
            Self::DataType => SimpleParser::new(simple::DATA_TYPE).parse(document),
        }
    }
}

/// Whether `path` lies under any known kind directory.
#[must_use]
pub fn is_known_document(path: &str) -> bool {
    path.to_ascii_lowercase().ends_with(".xml") && ParserKind::for_path(path).is_some()
}
