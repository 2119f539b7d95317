/// Implementation of `id3scan inspect`.
///
/// Scans a file for tags and prints one line per tag followed by one line
/// per frame. `--text` adds the decoded text, `--hex` a hex dump of the
/// payload, and `--frame ID` narrows the listing to one frame id.
///
/// # Output format
///
/// ```text
/// Tag 0: ID3v2.4.0 at offset 0, flags=0x00, 2 frames, 1024 bytes padding
///   TIT2 "Title/songname/content description" (12 bytes)
///        Text:  "Intro"
///   COMM "Comments" (20 bytes) [read-only]
/// ---
/// 1 tag, 2 frames
/// ```
///
/// With `--json` the same information is printed as a single JSON
/// document (see [`TagReport`]).
use std::fs::File;

use anyhow::{Context, Result};
use id3_decoder::{DecodedTag, Frame, Scanner, frame_name};
use serde::Serialize;
use tracing::info;

use crate::InspectArgs;

/// Run the `id3scan inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any tag in it is
/// malformed. Nothing is printed in that case.
pub fn run(args: &InspectArgs) -> Result<()> {
    let file =
        File::open(&args.file).with_context(|| format!("cannot open {}", args.file.display()))?;

    info!(file = %args.file.display(), "scanning");
    let tags: Vec<DecodedTag> = Scanner::new(file)
        .collect::<Result<_, _>>()
        .with_context(|| format!("failed to scan {}", args.file.display()))?;

    if args.json {
        let report: Vec<TagReport> = tags.iter().map(|tag| TagReport::new(tag, args)).collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut frame_count = 0;
    for (idx, tag) in tags.iter().enumerate() {
        let header = &tag.header;
        println!(
            "Tag {idx}: ID3{}.{} at offset {}, flags=0x{:02X}, {} frame{}, {} bytes padding",
            header.version,
            header.revision,
            tag.offset,
            header.flags.raw(),
            tag.frames.len(),
            plural(tag.frames.len()),
            tag.padding,
        );

        for frame in selected(tag, args) {
            frame_count += 1;
            print_frame(frame, args);
        }
    }

    println!("---");
    println!(
        "{} tag{}, {frame_count} frame{}",
        tags.len(),
        plural(tags.len()),
        plural(frame_count)
    );

    Ok(())
}

fn selected<'a>(tag: &'a DecodedTag, args: &'a InspectArgs) -> impl Iterator<Item = &'a Frame> {
    tag.frames
        .iter()
        .filter(|frame| args.frame.is_none_or(|id| frame.id == id))
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

// ── Text output ───────────────────────────────────────────────────────────────

fn print_frame(frame: &Frame, args: &InspectArgs) {
    let name = frame_name(frame.id).map_or_else(String::new, |name| format!(" {name:?}"));
    let flags: Vec<_> = frame.flags.names(frame.version).collect();
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    println!("  {}{name} ({} bytes){flags}", frame.id, frame.data.len());

    if args.text {
        match frame.text() {
            Ok(text) => println!("       Text:  {text:?}"),
            Err(e) => println!("       Text:  <{e}>"),
        }
    }

    if args.hex {
        println!("       Hex dump:");
        for (i, chunk) in frame.data.chunks(16).enumerate() {
            let offset = i * 16;
            let hex = hex_line(chunk);
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
                .collect();
            println!("         {offset:04x}  {hex:<48}  {ascii}");
        }
    }
}

/// `03 54 65 73 74`: space-separated lowercase hex.
fn hex_line(chunk: &[u8]) -> String {
    chunk
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── JSON output ───────────────────────────────────────────────────────────────

/// One tag in the `--json` report.
#[derive(Serialize)]
struct TagReport {
    offset: u64,
    version: String,
    revision: u8,
    flags: u8,
    size: u32,
    padding: usize,
    frames: Vec<FrameReport>,
}

/// One frame in the `--json` report. `text` and `text_error` appear with
/// `--text`, `data` (hex) with `--hex`.
#[derive(Serialize)]
struct FrameReport {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    flags: u16,
    flag_names: Vec<&'static str>,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

impl TagReport {
    fn new(tag: &DecodedTag, args: &InspectArgs) -> Self {
        Self {
            offset: tag.offset,
            version: tag.header.version.to_string(),
            revision: tag.header.revision,
            flags: tag.header.flags.raw(),
            size: tag.header.size,
            padding: tag.padding,
            frames: selected(tag, args)
                .map(|frame| FrameReport::new(frame, args))
                .collect(),
        }
    }
}

impl FrameReport {
    fn new(frame: &Frame, args: &InspectArgs) -> Self {
        let (text, text_error) = if args.text {
            match frame.text() {
                Ok(text) => (Some(text), None),
                Err(e) => (None, Some(e.to_string())),
            }
        } else {
            (None, None)
        };

        Self {
            id: frame.id.to_string(),
            name: frame_name(frame.id),
            flags: frame.flags.raw(),
            flag_names: frame.flags.names(frame.version).collect(),
            size: frame.data.len(),
            text,
            text_error,
            data: args.hex.then(|| hex::encode(&frame.data)),
        }
    }
}
