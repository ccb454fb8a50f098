#![no_main]

use breakout::series::parse_series;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // History parsing must reject bad input without panicking
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_series(input);
    }
});
