//! The async scanner must agree with the blocking one.

use id3_decoder::{AsyncScanner, DecodeError, ScanConfig, ids, scan_async, scan_bytes};
use id3_tests::{FrameSpec, TagBuilder, audio};
use tokio::io::AsyncWriteExt;

fn stream() -> Vec<u8> {
    let mut input = audio(2048);
    input.extend(
        TagBuilder::v23()
            .frame(FrameSpec::latin1(b"TIT2", "Streamed"))
            .frame(FrameSpec::comment("Über"))
            .padding(100)
            .build(),
    );
    input.extend(audio(10_000));
    input.extend(
        TagBuilder::v24()
            .unsynchronised()
            .frame(FrameSpec::new(b"APIC", vec![0xFF; 3000]))
            .footer()
            .build(),
    );
    input
}

#[tokio::test]
async fn duplex_stream_matches_blocking_scan() {
    let input = stream();
    let expected = scan_bytes(&input).unwrap();

    let (mut tx, rx) = tokio::io::duplex(61);
    let payload = input.clone();
    let writer = tokio::spawn(async move {
        for chunk in payload.chunks(97) {
            tx.write_all(chunk).await.unwrap();
        }
    });

    let frames = scan_async(rx).await.unwrap();
    writer.await.unwrap();

    assert_eq!(frames, expected);
    assert_eq!(frames.lookup(ids::COMM).unwrap().text().unwrap(), "Uber");
    assert_eq!(frames.lookup(ids::APIC).unwrap().data, vec![0xFF; 3000]);
}

#[tokio::test]
async fn async_scanner_reports_offsets_and_position() {
    let input = stream();
    let config = ScanConfig {
        initial_capacity: 64,
        ..ScanConfig::default()
    };
    let mut scanner = AsyncScanner::with_config(&input[..], &config);

    let first = scanner.next().await.unwrap().unwrap();
    let second = scanner.next().await.unwrap().unwrap();
    assert!(scanner.next().await.is_none());

    assert_eq!(first.offset, 2048);
    assert_eq!(second.offset + second.header.tag_len() as u64, input.len() as u64);
    assert_eq!(scanner.position(), input.len() as u64);
}

#[tokio::test]
async fn async_errors_match_blocking_errors() {
    let input = stream();
    let cut = &input[..input.len() - 1];

    let blocking = scan_bytes(cut).unwrap_err();
    let streamed = scan_async(cut).await.unwrap_err();
    assert!(matches!(streamed, DecodeError::IncompleteTag { .. }));
    assert_eq!(streamed.to_string(), blocking.to_string());
}
