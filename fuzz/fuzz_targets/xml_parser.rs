#![no_main]
use konwert::{xml, xml_to_value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(root) = xml::parse(data, &xml::Config::default()) {
        let _ = xml::to_string(&root, &xml::Config::default());
        let _ = xml_to_value(&root);
    }
});
