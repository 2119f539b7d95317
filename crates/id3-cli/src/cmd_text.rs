/// Implementation of `id3scan text`.
///
/// Prints the decoded text of the last frame with the given id, the same
/// frame [`Frames::lookup`](id3_decoder::Frames::lookup) returns.
///
/// ```text
/// $ id3scan text song.mp3 TIT2
/// Intro
/// ```
use anyhow::{Context, Result, bail};
use id3_decoder::scan_file;

use crate::TextArgs;

/// Run the `id3scan text` command.
///
/// # Errors
///
/// Returns an error if the file cannot be scanned, has no frame with the
/// requested id, or the frame's payload is not decodable text.
pub fn run(args: &TextArgs) -> Result<()> {
    let frames =
        scan_file(&args.file).with_context(|| format!("failed to scan {}", args.file.display()))?;

    let Some(frame) = frames.lookup(args.id) else {
        bail!("no {} frame in {}", args.id, args.file.display());
    };

    let text = frame
        .text()
        .with_context(|| format!("cannot decode {} as text", args.id))?;
    println!("{text}");

    Ok(())
}
