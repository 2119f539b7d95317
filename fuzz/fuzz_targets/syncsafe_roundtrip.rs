#![no_main]

use id3_wire::syncsafe::{decode_syncsafe, encode_syncsafe, SYNCSAFE_MAX};
use libfuzzer_sys::fuzz_target;

// Fuzz target: syncsafe encode->decode roundtrip.
//
// Takes 4 bytes of fuzz input as a u32. Values up to SYNCSAFE_MAX must
// roundtrip; anything larger must refuse to encode.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let value = u32::from_be_bytes(data[..4].try_into().unwrap());

    match encode_syncsafe(value) {
        Some(bytes) => {
            assert!(value <= SYNCSAFE_MAX);
            assert!(bytes.iter().all(|b| b & 0x80 == 0));
            assert_eq!(decode_syncsafe(bytes), Some(value));
        }
        None => assert!(value > SYNCSAFE_MAX),
    }
});
