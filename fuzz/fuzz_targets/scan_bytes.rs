#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: whole-stream scan over arbitrary bytes.
//
// Catches bugs in:
// - Magic search across the 2-byte carry window
// - Size arithmetic for headers, extended headers and frames
// - Padding and footer checks at the end of the body
fuzz_target!(|data: &[u8]| {
    let _ = id3_decoder::scan_bytes(data);
});
