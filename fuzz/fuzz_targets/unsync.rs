#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: resynchronisation never grows the data and drops at most
// one byte per FF 00 pair in the input.
fuzz_target!(|data: &[u8]| {
    let out = id3_wire::unsync::decode_unsync(data);
    assert!(out.len() <= data.len());

    let pairs = data.windows(2).filter(|w| w == &[0xFF, 0x00]).count();
    assert!(data.len() - out.len() <= pairs);
});
