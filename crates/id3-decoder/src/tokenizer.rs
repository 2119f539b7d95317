use id3_wire::WireError;
use id3_wire::header::{HEADER_SIZE, Probe, RejectReason, TAG_MAGIC, TagHeader};

/// What the tokenizer found in the buffered window.
///
/// Offsets are relative to the start of the window passed to [`locate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    /// A complete tag block occupies `start..start + len`.
    Tag {
        start: usize,
        len: usize,
        header: TagHeader,
    },

    /// "ID3" at `start` is not a usable tag. Scanning resumes three bytes
    /// later, not past the whole false header, so a real tag that starts
    /// inside it is still found.
    Skip { start: usize, reason: RejectReason },

    /// Discard `advance` bytes, then wait for more input. `needed` is the
    /// window length required after discarding, when already known.
    NeedMore {
        advance: usize,
        needed: Option<usize>,
    },

    /// End of stream inside the candidate at `start`.
    Incomplete { start: usize },
}

impl Split {
    /// Bytes of the window that can be dropped after handling this split.
    #[must_use]
    pub fn advance(&self) -> usize {
        match *self {
            Self::Tag { start, len, .. } => start + len,
            Self::Skip { start, .. } => start + TAG_MAGIC.len(),
            Self::NeedMore { advance, .. } => advance,
            Self::Incomplete { start } => start,
        }
    }
}

/// Find the next tag block in `data`.
///
/// This is a pure function of the buffered window, so any chunking of the
/// input yields the same sequence of splits as delivering it all at once.
/// `at_eof` tells it that no more input will follow, which turns a
/// partially buffered candidate into [`Split::Incomplete`].
///
/// ```text
///   no "ID3"             → NeedMore, keep the last 2 bytes (split magic)
///   "ID3" + < 10 bytes   → NeedMore from the magic, or Incomplete at EOF
///   bad pattern/version/
///   unknown flags        → Skip, resume at magic + 3
///   tag not yet buffered → NeedMore from the magic, or Incomplete at EOF
///   otherwise            → Tag
/// ```
///
/// # Errors
///
/// Only if the header probe disagrees with the magic search, which would
/// be a bug in this module.
pub fn locate(data: &[u8], at_eof: bool) -> Result<Split, WireError> {
    let Some(start) = find_magic(data) else {
        return Ok(Split::NeedMore {
            advance: data.len().saturating_sub(TAG_MAGIC.len() - 1),
            needed: None,
        });
    };

    let candidate = &data[start..];
    if candidate.len() < HEADER_SIZE {
        return Ok(need_more(start, HEADER_SIZE, at_eof));
    }

    let header = match TagHeader::probe(candidate)? {
        Probe::Tag(header) => header,
        Probe::Reject(reason) => return Ok(Split::Skip { start, reason }),
    };

    let len = header.tag_len();
    if candidate.len() < len {
        return Ok(need_more(start, len, at_eof));
    }

    Ok(Split::Tag { start, len, header })
}

fn need_more(start: usize, needed: usize, at_eof: bool) -> Split {
    if at_eof {
        Split::Incomplete { start }
    } else {
        Split::NeedMore {
            advance: start,
            needed: Some(needed),
        }
    }
}

fn find_magic(data: &[u8]) -> Option<usize> {
    data.windows(TAG_MAGIC.len()).position(|w| w == TAG_MAGIC)
}
