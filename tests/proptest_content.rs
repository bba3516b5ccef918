//! Property-based tests for document normalization, hashing and parsing.
//!
//! Markup parsing and document detection must never panic on arbitrary
//! input; normalization must be stable and blind to version bookkeeping.

use blueprint_tools::content::{DiffHash, DiffHasher, normalize};
use blueprint_tools::parsers::{XmlElement, parse_document};
use proptest::prelude::*;

/// Document fragments that exercise every normalization pass.
fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,12}",
        Just("\n".to_string()),
        Just("\n\n  \n".to_string()),
        Just("<rule name=\"r\">".to_string()),
        Just("</rule>".to_string()),
        Just("<definition>a + b</definition>".to_string()),
        "[a-z0-9-]{1,8}".prop_map(|v| format!("<versionUuid>{v}</versionUuid>")),
        "[a-z0-9-]{1,8}".prop_map(|v| format!("<a:versionUuid>{v}</a:versionUuid>")),
        "[a-z0-9-]{1,8}"
            .prop_map(|v| format!("<history><historyInfo versionUuid=\"{v}\"/></history>")),
        Just("<contentHaul xmlns:a=\"urn:a\">".to_string()),
        Just("</contentHaul>".to_string()),
        Just("<migrationVersion>3</migrationVersion>".to_string()),
        Just("<x xsi:type=\"t\"/>".to_string()),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..24).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn normalize_is_idempotent(doc in document()) {
        let once = normalize(&doc);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_text_has_no_bookkeeping(doc in document()) {
        let text = normalize(&doc);
        prop_assert!(!text.contains("versionUuid"));
        prop_assert!(!text.contains("<history"));
        prop_assert!(!text.contains("Haul"));
        prop_assert!(!text.contains("  "));
    }

    #[test]
    fn hash_ignores_version_identifier(
        body in "[a-z+ ]{0,40}",
        v1 in "[a-f0-9]{8}",
        v2 in "[a-f0-9]{8}",
    ) {
        let hasher = DiffHasher::default();
        let doc = |v: &str| format!(
            "<contentHaul><rule><versionUuid>{v}</versionUuid><definition>{body}</definition></rule></contentHaul>"
        );
        prop_assert_eq!(hasher.hash(&doc(&v1)), hasher.hash(&doc(&v2)));
    }

    #[test]
    fn hash_is_deterministic(doc in document()) {
        let hasher = DiffHasher::default();
        let first = hasher.hash(&doc);
        prop_assert!(first.is_available());
        prop_assert_eq!(hasher.hash(&doc), first);
    }

    #[test]
    fn hash_cap_is_exact(len in 0usize..64, cap in 0usize..64) {
        let doc = "x".repeat(len);
        let hash = DiffHasher::new(cap).hash(&doc);
        prop_assert_eq!(hash == DiffHash::Unavailable, len > cap);
    }

    #[test]
    fn markup_parser_never_panics(input in "\\PC{0,400}") {
        let _ = XmlElement::parse_document(&input);
    }

    #[test]
    fn markup_parser_never_panics_on_tag_soup(
        parts in prop::collection::vec(
            prop_oneof![
                Just("<a>"), Just("</a>"), Just("<b x='1'/>"), Just("<![CDATA[z]]>"),
                Just("&amp;"), Just("<!-- c -->"), Just("<"), Just(">"), Just("text"),
            ],
            0..30,
        )
    ) {
        let _ = XmlElement::parse_document(&parts.concat());
    }

    #[test]
    fn parse_document_never_panics(
        dir in prop_oneof![
            Just("content"), Just("processModel"), Just("recordType"), Just("site"),
            Just("group"), Just("unknown"),
        ],
        input in "\\PC{0,300}",
    ) {
        let _ = parse_document(&format!("{dir}/doc.xml"), &input);
    }
}
