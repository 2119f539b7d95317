#![no_main]

use id3_wire::{FrameHeader, Version};
use libfuzzer_sys::fuzz_target;

// Fuzz target: FrameHeader::read_from under both versions.
//
// Catches bugs in:
// - Frame id validation (legacy trailing zero, all-zero padding)
// - Syncsafe vs big-endian size decoding
// - Payload bounds against the remaining tag body
fuzz_target!(|data: &[u8]| {
    for version in [Version::V23, Version::V24] {
        if let Ok(Some(header)) = FrameHeader::read_from(data, version) {
            assert!(header.frame_len() <= data.len());
        }
    }
});
