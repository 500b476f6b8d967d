#![no_main]
use konwert::yaml;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = yaml::parse(data, &yaml::Config::default()) {
        let _ = yaml::to_string(&value);
    }
});
