#![no_main]

use arbitrary::Arbitrary;
use id3_decoder::{decode_text, Frame, FrameFlags, FrameId, Version};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzFrame {
    comment: bool,
    v24: bool,
    flags: u16,
    data: Vec<u8>,
}

// Fuzz target: text decoding of arbitrary frame payloads.
//
// Catches bugs in:
// - Encoding byte dispatch
// - UTF-16 byte order marks and odd-length bodies
// - Comment prefix handling and NFKD filtering
fuzz_target!(|input: FuzzFrame| {
    let id = if input.comment { *b"COMM" } else { *b"TIT2" };
    let frame = Frame {
        id: FrameId::new(id),
        version: if input.v24 { Version::V24 } else { Version::V23 },
        flags: FrameFlags::from_raw(input.flags),
        data: input.data,
    };

    if let Ok(text) = decode_text(&frame) {
        if input.comment {
            assert!(text.bytes().all(|b| (b' '..0x7F).contains(&b)));
        }
    }
});
