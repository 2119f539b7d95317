use id3_wire::extended::extended_header_len;
use id3_wire::header::{HEADER_SIZE, verify_footer};
use id3_wire::unsync::decode_unsync;
use id3_wire::{FRAME_HEADER_SIZE, FrameFlags, FrameHeader, TagHeader, Version, WireError};
use tracing::{debug, trace};

use crate::error::DecodeError;
use crate::frame::Frame;

/// One decoded tag block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedTag {
    pub header: TagHeader,

    /// Stream offset of the tag's "ID3" magic.
    pub offset: u64,

    pub frames: Vec<Frame>,

    /// Zero bytes following the last frame.
    pub padding: usize,
}

/// Decode a complete tag block as emitted by the tokenizer.
///
/// The block layout is consumed front to back:
///
/// ```text
/// ┌────────────────────┐
/// │ header (10)        │ ← re-validated
/// │ extended header    │ ← skipped, if flagged
/// │ frame 0..N         │ ← id(4) size(4) flags(2) payload
/// │ padding            │ ← all zero, absent with a footer
/// │ footer (10)        │ ← "3DI" + header[3..10], if flagged
/// └────────────────────┘
/// ```
///
/// Frame payloads are copied out of `block`, resynchronised when either
/// the tag-level unsynchronisation flag or the v2.4 frame-level flag says
/// so. For v2.4 the frame-level flag is then cleared, since the stored
/// data no longer needs it.
///
/// # Errors
///
/// - [`DecodeError::InvalidHeader`] if `block` does not start with a
///   supported header.
/// - [`DecodeError::Wire`] for a bad footer, extended header, frame id,
///   or frame size.
/// - [`DecodeError::PaddingWithFooter`] / [`DecodeError::InvalidPadding`]
///   if the bytes after the last frame are not valid padding.
pub fn decode_tag(block: &[u8], offset: u64) -> Result<DecodedTag, DecodeError> {
    let header = TagHeader::read_from(block).map_err(DecodeError::InvalidHeader)?;
    let version = header.version;

    let body_end = HEADER_SIZE + header.body_len();
    let body = block
        .get(HEADER_SIZE..body_end)
        .ok_or(WireError::UnexpectedEof { offset: block.len() })?;

    if header.flags.has_footer() {
        verify_footer(block, &block[body_end..])?;
    }

    let mut pos = 0;
    if header.flags.has_extended_header() {
        pos = extended_header_len(version, body)?;
        trace!(len = pos, "skipped extended header");
    }

    let mut frames = Vec::new();
    while body.len() - pos > FRAME_HEADER_SIZE {
        let Some(frame_header) = FrameHeader::read_from(&body[pos..], version)? else {
            break;
        };

        let payload = &body[pos + FRAME_HEADER_SIZE..pos + frame_header.frame_len()];
        let mut flags = frame_header.flags;
        let data = if header.flags.is_unsynchronised() || flags.is_unsynchronised(version) {
            if version == Version::V24 {
                flags = flags.without(FrameFlags::V24_UNSYNCHRONISATION);
            }
            decode_unsync(payload)
        } else {
            payload.to_vec()
        };

        trace!(
            id = %frame_header.id,
            size = frame_header.size,
            flags = flags.raw(),
            "decoded frame"
        );

        frames.push(Frame {
            id: frame_header.id,
            version,
            flags,
            data,
        });
        pos += frame_header.frame_len();
    }

    let padding = &body[pos..];
    if header.flags.has_footer() && !padding.is_empty() {
        return Err(DecodeError::PaddingWithFooter { len: padding.len() });
    }

    if let Some(index) = padding.iter().position(|&b| b != 0) {
        return Err(DecodeError::InvalidPadding {
            offset: HEADER_SIZE + pos + index,
        });
    }

    debug!(
        offset,
        %version,
        frames = frames.len(),
        padding = padding.len(),
        "decoded tag"
    );

    Ok(DecodedTag {
        header,
        offset,
        frames,
        padding: padding.len(),
    })
}
