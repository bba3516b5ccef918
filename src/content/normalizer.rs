//! Strips version-variant markup from package documents.
//!
//! Two exports of the same object differ in bookkeeping even when nothing
//! meaningful changed: a fresh version identifier, a longer history block,
//! namespace declarations, migration metadata, and the `*Haul` transport
//! wrapper. The passes below remove those, in order, and then collapse
//! whitespace so the remaining text is stable across exports.

use regex::Regex;
use std::sync::LazyLock;

fn element_pattern(tag: &str) -> Regex {
    // Self-closing or paired element, optionally prefixed, lazily matched so
    // several occurrences are removed individually.
    let pattern = format!(
        r"(?s)<(?:[\w.-]+:)?{tag}\b[^>]*?(?:/>|>.*?</(?:[\w.-]+:)?{tag}\s*>)"
    );
    Regex::new(&pattern).expect("static regex")
}

static VERSION_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| element_pattern("versionUuid"));
static HISTORY_BLOCKS: LazyLock<Regex> = LazyLock::new(|| element_pattern("history"));
static NAMESPACE_ATTRS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+xmlns(?::[\w.-]+)?\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("static regex")
});
static SCHEMA_INSTANCE_ATTRS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+xsi:[\w.-]+\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("static regex")
});
static MIGRATION_ELEMENTS: LazyLock<Regex> =
    LazyLock::new(|| element_pattern("migrationVersion"));
static HAUL_WRAPPER_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?(?:[\w.-]+:)?\w+Haul\b[^>]*>").expect("static regex")
});
static REPEATED_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("static regex"));
static REPEATED_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[ \t]*\r?\n){2,}").expect("static regex"));

/// Remove version-variant markup and collapse whitespace.
///
/// Normalizing already-normalized text returns it unchanged.
#[must_use]
pub fn normalize(content: &str) -> String {
    let passes: [&Regex; 6] = [
        &VERSION_ELEMENTS,
        &HISTORY_BLOCKS,
        &NAMESPACE_ATTRS,
        &SCHEMA_INSTANCE_ATTRS,
        &MIGRATION_ELEMENTS,
        &HAUL_WRAPPER_TAGS,
    ];

    let mut text = content.to_string();
    for pattern in passes {
        if let std::borrow::Cow::Owned(replaced) = pattern.replace_all(&text, "") {
            text = replaced;
        }
    }

    let text = REPEATED_SPACES.replace_all(&text, " ");
    let text = REPEATED_BLANK_LINES.replace_all(&text, "\n");
    text.trim().to_string()
}
