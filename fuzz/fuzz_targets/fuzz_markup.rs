#![no_main]
use blueprint_tools::parsers::{XmlElement, extract_lineage};
use libfuzzer_sys::fuzz_target;

/// Fuzz the markup reader and the history extractor on whatever it accepts.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(root) = XmlElement::parse_document(s)
    {
        let _ = extract_lineage(&root);
        let _ = root.descendants().count();
    }
});
