#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(symbol) = std::str::from_utf8(data) {
        let decoded = undname::decode(symbol);
        let _ = decoded.to_string();
        let _ = undname::classify(&decoded);
    }
});
