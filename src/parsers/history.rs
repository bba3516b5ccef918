//! Version-history extraction.
//!
//! History blocks list earlier versions of an object, newest first:
//!
//! ```xml
//! <history>
//!   <historyInfo versionUuid="...">
//!     <createdTimestamp>2024-03-01T10:00:00Z</createdTimestamp>
//!     <creator>jane</creator>
//!     <comment>Added approval step</comment>
//!   </historyInfo>
//! </history>
//! ```

use super::markup::XmlElement;
use crate::model::VersionEntry;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Alternate timestamp layouts tried after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Extract the version lineage from the first `history` block under `scope`.
///
/// Entries without a version identifier are dropped. A document without a
/// history block has an empty lineage.
#[must_use]
pub fn extract_lineage(scope: &XmlElement) -> Vec<VersionEntry> {
    let history = if scope.name == "history" {
        Some(scope)
    } else {
        scope.find("history")
    };
    let Some(history) = history else {
        return Vec::new();
    };

    history
        .children
        .iter()
        .filter_map(parse_entry)
        .collect()
}

fn parse_entry(info: &XmlElement) -> Option<VersionEntry> {
    let version_id = info
        .attr("versionUuid")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .or_else(|| info.child_text("versionUuid"))?;

    let field = |names: &[&str]| -> String {
        names
            .iter()
            .find_map(|n| info.attr(n).or_else(|| info.child_text(n)))
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let mut entry = VersionEntry::new(version_id);
    entry.timestamp = parse_timestamp(&field(&["timestamp", "createdTimestamp", "createdAt"]));
    entry.author = field(&["author", "creator", "user"]);
    entry.description = field(&["comment", "description", "versionComment"]);
    Some(entry)
}

/// Parse a history timestamp, falling back to the Unix epoch.
#[must_use]
pub fn parse_timestamp(value: &str) -> DateTime<Utc> {
    let value = value.trim();
    if value.is_empty() {
        return DateTime::<Utc>::UNIX_EPOCH;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(&Utc);
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return naive.and_utc();
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return midnight.and_utc();
    }
    tracing::debug!(value, "unrecognised history timestamp");
    DateTime::<Utc>::UNIX_EPOCH
}
