//! Malformed and borderline input.
//!
//! Covers the two ways a scan can react to bad bytes:
//!
//! - candidates that only look like a tag are skipped silently
//! - structural damage inside a recognised tag aborts the scan

use id3_decoder::{DecodeError, ScanConfig, Scanner, Version, scan_bytes};
use id3_tests::{FrameSpec, TagBuilder, audio, syncsafe};
use id3_wire::WireError;

fn first_error(input: &[u8]) -> DecodeError {
    scan_bytes(input).unwrap_err()
}

// ── False candidates ──────────────────────────────────────────────────────────

#[test]
fn false_candidates_before_a_real_tag() {
    let mut input = audio(100);
    input.extend_from_slice(b"ID3\xFF\x00\x00\x00\x00\x00\x00");
    input.extend(TagBuilder::with_version(2).build());
    input.extend(TagBuilder::with_version(5).build());
    input.extend(TagBuilder::v24().raw_flags(0x08).build());
    input.extend_from_slice(b"ID3\x03\x00\x00\x00\x00\x00\x80");
    let real = input.len() as u64;
    input.extend(
        TagBuilder::v23()
            .frame(FrameSpec::latin1(b"TIT2", "real"))
            .build(),
    );

    let tags: Vec<_> = Scanner::new(&input[..]).map(Result::unwrap).collect();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].offset, real);
    assert_eq!(tags[0].header.version, Version::V23);
    assert_eq!(tags[0].frames[0].text().unwrap(), "real");
}

#[test]
fn tag_starting_inside_a_false_header() {
    // The real magic begins three bytes into the rejected one.
    let mut input = b"ID3".to_vec();
    input.extend(TagBuilder::v24().frame(FrameSpec::utf8(b"TIT2", "x")).build());

    // "ID3ID3\x04..." is itself rejected (version byte 'I'), then found again.
    let tags: Vec<_> = Scanner::new(&input[..]).map(Result::unwrap).collect();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].offset, 3);
}

// ── Footer and padding ────────────────────────────────────────────────────────

#[test]
fn footer_must_mirror_header() {
    let mut input = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"TIT2", "x"))
        .footer()
        .build();
    let last = input.len() - 1;
    input[last] ^= 0x01;

    assert!(matches!(
        first_error(&input),
        DecodeError::Wire(WireError::InvalidFooter)
    ));
}

#[test]
fn footer_version_and_flags_must_mirror_header() {
    let tag = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"TIT2", "x"))
        .footer()
        .build();
    let footer = tag.len() - 10;

    // Footer bytes 3 and 5 repeat the header's version and flags.
    for (field, value) in [(3, 0x03), (5, 0x90)] {
        let mut input = audio(64);
        let mut bad = tag.clone();
        bad[footer + field] = value;
        input.extend(bad);

        let results: Vec<_> = Scanner::new(&input[..]).collect();
        assert_eq!(results.len(), 1, "footer byte {field}");
        assert!(
            matches!(results[0], Err(DecodeError::Wire(WireError::InvalidFooter))),
            "footer byte {field}: {:?}",
            results[0]
        );
    }
}

#[test]
fn footer_without_padding_decodes() {
    let input = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"TIT2", "x"))
        .footer()
        .build();

    let tags: Vec<_> = Scanner::new(&input[..]).map(Result::unwrap).collect();
    assert_eq!(tags[0].padding, 0);
    assert_eq!(tags[0].header.tag_len(), input.len());
}

#[test]
fn padding_and_footer_conflict() {
    let input = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"TIT2", "x"))
        .padding(4)
        .footer()
        .build();

    assert!(matches!(
        first_error(&input),
        DecodeError::PaddingWithFooter { len: 4 }
    ));
}

#[test]
fn nonzero_padding_reports_offset() {
    let mut padding = [0u8; 20];
    padding[15] = 0x01;
    let input = TagBuilder::v23()
        .frame(FrameSpec::latin1(b"TIT2", "x"))
        .raw_padding(&padding)
        .build();

    // header (10) + frame header (10) + payload (3) + 15 zero bytes
    assert!(matches!(
        first_error(&input),
        DecodeError::InvalidPadding { offset: 38 }
    ));
}

#[test]
fn short_nonzero_tail_is_invalid_padding() {
    let input = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"TIT2", "x"))
        .raw_padding(b"TALB")
        .build();

    assert!(matches!(
        first_error(&input),
        DecodeError::InvalidPadding { .. }
    ));
}

// ── Extended header ───────────────────────────────────────────────────────────

#[test]
fn extended_headers_are_skipped() {
    let v23 = TagBuilder::v23()
        .extended_header(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00])
        .frame(FrameSpec::latin1(b"TALB", "three"))
        .build();
    let v24 = TagBuilder::v24()
        .extended_header(&[0x01, 0x00])
        .frame(FrameSpec::utf8(b"TALB", "four"))
        .padding(8)
        .build();

    let mut input = v23;
    input.extend(v24);

    let frames = scan_bytes(&input).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].text().unwrap(), "three");
    assert_eq!(frames[1].text().unwrap(), "four");
}

#[test]
fn extended_header_flag_without_header() {
    // The first frame's id is read as the extended header size.
    let input = TagBuilder::v24()
        .raw_flags(0x40)
        .frame(FrameSpec::utf8(b"TIT2", "x"))
        .build();

    assert!(matches!(
        first_error(&input),
        DecodeError::Wire(WireError::InvalidExtendedHeaderSize)
    ));
}

// ── Frame headers ─────────────────────────────────────────────────────────────

#[test]
fn invalid_frame_id() {
    let input = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"tit2", "x"))
        .build();

    assert!(matches!(
        first_error(&input),
        DecodeError::Wire(WireError::InvalidFrameId { found }) if &found == b"tit2"
    ));
}

#[test]
fn v24_frame_size_must_be_syncsafe() {
    let input = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"TIT2", "x").with_raw_size([0x00, 0x00, 0x00, 0x80]))
        .padding(200)
        .build();

    assert!(matches!(
        first_error(&input),
        DecodeError::Wire(WireError::InvalidFrameSize)
    ));
}

#[test]
fn v23_frame_size_is_plain_big_endian() {
    // 0x80 is not syncsafe, but v2.3 sizes are ordinary integers.
    let input = TagBuilder::v23()
        .frame(FrameSpec::new(b"PRIV", vec![0x11; 0x80]))
        .build();

    let frames = scan_bytes(&input).unwrap();
    assert_eq!(frames[0].data.len(), 0x80);
}

#[test]
fn frame_size_exceeding_tag() {
    let input = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"TIT2", "x").with_raw_size(syncsafe(1000)))
        .build();

    assert!(matches!(
        first_error(&input),
        DecodeError::Wire(WireError::FrameSizeExceedsTag { size: 1000, .. })
    ));
}

// ── Stream-level failures ─────────────────────────────────────────────────────

#[test]
fn truncated_tag_reports_magic_offset() {
    let mut input = audio(500);
    let tag = TagBuilder::v24()
        .frame(FrameSpec::utf8(b"TIT2", "cut short"))
        .build();
    input.extend_from_slice(&tag[..tag.len() - 3]);

    assert!(matches!(
        first_error(&input),
        DecodeError::IncompleteTag { offset: 500 }
    ));
}

#[test]
fn magic_at_end_of_stream_is_incomplete() {
    let mut input = audio(40);
    input.extend_from_slice(b"ID3\x04");

    assert!(matches!(
        first_error(&input),
        DecodeError::IncompleteTag { offset: 40 }
    ));
}

#[test]
fn oversized_tag_is_refused() {
    let input = TagBuilder::v24()
        .frame(FrameSpec::new(b"PRIV", vec![0; 200]))
        .build();
    let config = ScanConfig {
        max_tag_size: 64,
        ..ScanConfig::default()
    };

    let mut scanner = Scanner::with_config(&input[..], &config);
    assert!(matches!(
        scanner.next(),
        Some(Err(DecodeError::TagTooLarge { len: 220, limit: 64 }))
    ));
    assert!(scanner.next().is_none());
}

#[test]
fn error_keeps_earlier_tags() {
    let mut input = TagBuilder::v23()
        .frame(FrameSpec::latin1(b"TIT2", "good"))
        .build();
    input.extend(TagBuilder::v24().raw_padding(&[0, 9]).build());

    let results: Vec<_> = Scanner::new(&input[..]).collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().frames[0].text().unwrap(), "good");
    assert!(matches!(
        results[1],
        Err(DecodeError::InvalidPadding { offset: 11 })
    ));
}
