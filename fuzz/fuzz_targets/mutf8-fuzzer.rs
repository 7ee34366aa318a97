#![no_main]

use dalvik_dex::mutf8;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = mutf8::decode(data);
});
