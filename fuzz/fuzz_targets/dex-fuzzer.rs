#![no_main]

use dalvik_dex::Dex;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // must provide at least 8 bytes to reach the endian tag peek
    if data.len() < 8 {
        return;
    }

    if let Ok(mut dex) = Dex::new(data.to_vec()) {
        let _ = dex.parse_dex(true);
    }
});
