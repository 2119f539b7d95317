#![no_main]

use id3_wire::header::{Probe, HEADER_SIZE};
use id3_wire::TagHeader;
use libfuzzer_sys::fuzz_target;

// Fuzz target: TagHeader::probe on arbitrary 10-byte windows.
//
// Whatever probe accepts, read_from must accept too and report the same
// header, and the tag length must cover the header itself.
fuzz_target!(|data: &[u8]| {
    let Ok(Probe::Tag(header)) = TagHeader::probe(data) else {
        return;
    };

    let again = TagHeader::read_from(data).unwrap();
    assert_eq!(again, header);
    assert!(header.tag_len() >= HEADER_SIZE + header.body_len());
});
