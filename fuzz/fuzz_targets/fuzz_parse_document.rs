#![no_main]
use blueprint_tools::parsers::{ParserKind, parse_document};
use libfuzzer_sys::fuzz_target;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz every object parser.
///
/// The first byte picks the object-kind directory; the rest is the document,
/// tried raw and wrapped in a content envelope.
fuzz_target!(|data: &[u8]| {
    let Some((selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(s) = std::str::from_utf8(rest) else {
        return;
    };
    let kind = ParserKind::ALL[usize::from(*selector) % ParserKind::ALL.len()];
    let path = format!("{}/fuzz.xml", kind.directory());

    let _ = parse_document(&path, s);

    if s.len() < MAX_WRAPPED_INPUT_LEN {
        let wrapped = format!(r#"<contentHaul><rule name="fuzz" uuid="f-1">{s}</rule></contentHaul>"#);
        let _ = parse_document(&path, &wrapped);
    }
});
