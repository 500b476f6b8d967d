#![no_main]
use konwert::{convert, Format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = convert(s, Format::Json, Format::Xml);
        let _ = convert(s, Format::Json, Format::Yaml);
    }
});
