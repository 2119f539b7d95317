/// Implementation of `id3scan validate`.
///
/// Scans the whole file and reports either a series of success checkmarks
/// (`✓`) or a diagnostic for the first malformed tag (`✗`). The command
/// exits with code 0 on a valid file and code 1 on any error (the main
/// dispatcher in `main.rs` converts `Err` to exit code 1).
///
/// # Success output
///
/// ```text
/// ✓ Tags: 2 tags found (ID3v2.3 at 0, ID3v2.4 at 4096)
/// ✓ Frames: 14 frames decoded
/// ✓ Padding: 1024 bytes, all zero
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: invalid padding at tag offset 73 (after the tag at offset 0)
/// ```
///
/// A file without any tag is valid. Candidates that are skipped (bad
/// detection pattern, unsupported version, unknown flags) are not errors;
/// run with `-v` to see them.
use std::fs::File;

use anyhow::{Context, Result, anyhow};
use id3_decoder::{DecodeError, DecodedTag, Scanner};

use crate::ValidateArgs;

/// Run the `id3scan validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any tag in it is
/// malformed.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let file =
        File::open(&args.file).with_context(|| format!("cannot open {}", args.file.display()))?;

    let mut tags = Vec::new();
    for tag in Scanner::new(file) {
        match tag {
            Ok(tag) => tags.push(tag),
            Err(e) => {
                let last = tags.last().map(|tag: &DecodedTag| tag.offset);
                println!("✗ Error: {}", decode_error_diagnostic(&e, last));
                return Err(anyhow!("validation failed"));
            }
        }
    }

    for line in report(&tags) {
        println!("{line}");
    }

    Ok(())
}

fn report(tags: &[DecodedTag]) -> Vec<String> {
    let locations: Vec<String> = tags
        .iter()
        .map(|tag| format!("ID3{} at {}", tag.header.version, tag.offset))
        .collect();
    let frames: usize = tags.iter().map(|tag| tag.frames.len()).sum();
    let padding: usize = tags.iter().map(|tag| tag.padding).sum();

    let mut lines = Vec::new();
    if tags.is_empty() {
        lines.push("✓ Tags: no ID3v2 tag found".to_string());
    } else {
        lines.push(format!(
            "✓ Tags: {} tag{} found ({})",
            tags.len(),
            if tags.len() == 1 { "" } else { "s" },
            locations.join(", ")
        ));
        lines.push(format!(
            "✓ Frames: {frames} frame{} decoded",
            if frames == 1 { "" } else { "s" }
        ));
        lines.push(format!("✓ Padding: {padding} bytes, all zero"));
    }

    lines
}

// ── Error formatting ──────────────────────────────────────────────────────────

/// Converts a `DecodeError` into a human-readable diagnostic string.
///
/// ```text
/// ┌──────────────────────┬────────────────────────────────────────────┐
/// │ DecodeError variant  │ Diagnostic message                         │
/// ├──────────────────────┼────────────────────────────────────────────┤
/// │ IncompleteTag        │ "file ends inside the tag at offset N"     │
/// │ TagTooLarge          │ "<error Display>"                          │
/// │ InvalidPadding,      │ "<error Display> (after the tag at        │
/// │ PaddingWithFooter,   │  offset N)" when a tag preceded it         │
/// │ Wire                 │                                            │
/// │ others               │ "<error Display>"                          │
/// └──────────────────────┴────────────────────────────────────────────┘
/// ```
///
/// `last_tag` is the offset of the last tag decoded before the failure, if
/// any; the failing tag follows it.
fn decode_error_diagnostic(e: &DecodeError, last_tag: Option<u64>) -> String {
    let after = last_tag.map_or_else(String::new, |offset| {
        format!(" (after the tag at offset {offset})")
    });

    match e {
        DecodeError::IncompleteTag { offset } => {
            format!("file ends inside the tag at offset {offset}")
        }
        DecodeError::InvalidPadding { .. }
        | DecodeError::PaddingWithFooter { .. }
        | DecodeError::Wire(_) => format!("{e}{after}"),
        other => other.to_string(),
    }
}
