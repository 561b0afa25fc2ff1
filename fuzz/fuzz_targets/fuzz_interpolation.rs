#![no_main]

use libfuzzer_sys::fuzz_target;
use vbind_runtime::compiler::interpolation;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Some(found) = interpolation::find(text) {
        assert!(text.is_char_boundary(found.span.start));
        assert!(text.is_char_boundary(found.span.end));
        assert!(text[found.span.clone()].starts_with("{{"));
        let _ = found.substitute(text, "x");
    }
});
