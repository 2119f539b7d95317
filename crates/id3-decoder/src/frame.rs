use std::fmt;
use std::ops::Deref;

use id3_wire::{FrameFlags, FrameId, Version};

use crate::error::TextError;

/// A single decoded ID3v2 frame.
///
/// `data` is an owned copy of the payload with unsynchronisation already
/// undone, so frames stay valid after the scanner's buffer is reused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub id: FrameId,

    /// Version of the tag the frame was read from. Needed to interpret
    /// `flags`.
    pub version: Version,

    /// Flags as read from the wire, minus the v2.4 unsynchronisation bit
    /// once the payload has been resynchronised.
    pub flags: FrameFlags,

    pub data: Vec<u8>,
}

impl Frame {
    /// Interpret the payload as text. See [`decode_text`](crate::decode_text).
    ///
    /// # Errors
    ///
    /// Any [`TextError`]; the frame itself is unaffected.
    pub fn text(&self) -> Result<String, TextError> {
        crate::text::decode_text(self)
    }
}

/// Longest payload prefix shown by `Display`.
const DISPLAY_DATA_LIMIT: usize = 128;

impl fmt::Display for Frame {
    /// ```text
    /// Frame{ID: TIT2, Version: v2.4, Flags: 0x0000, Data: 5:"\x00Test"}
    /// ```
    ///
    /// Data is escaped byte-wise with `<[u8]>::escape_ascii`, so valid
    /// non-ASCII UTF-8 shows as `\xNN` escapes. Use [`Frame::text`] for
    /// readable text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (shown, ellipsis) = if self.data.len() > DISPLAY_DATA_LIMIT {
            (&self.data[..DISPLAY_DATA_LIMIT], "...")
        } else {
            (&self.data[..], "")
        };

        write!(
            f,
            "Frame{{ID: {}, Version: {}, Flags: {:#06x}, Data: {}:\"{}\"{ellipsis}}}",
            self.id,
            self.version,
            self.flags.raw(),
            self.data.len(),
            shown.escape_ascii(),
        )
    }
}

/// Frames in stream order, across every tag in the stream.
///
/// Not deduplicated: a file with several tags, or a tag repeating a frame
/// id, keeps every occurrence. [`lookup`](Self::lookup) follows the
/// convention that a later frame overrides an earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frames(Vec<Frame>);

impl Frames {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// The last frame with identifier `id`, if any.
    #[must_use]
    pub fn lookup(&self, id: FrameId) -> Option<&Frame> {
        self.0.iter().rev().find(|frame| frame.id == id)
    }

    pub fn push(&mut self, frame: Frame) {
        self.0.push(frame);
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Frame> {
        self.0
    }
}

impl Deref for Frames {
    type Target = [Frame];

    fn deref(&self) -> &[Frame] {
        &self.0
    }
}

impl From<Vec<Frame>> for Frames {
    fn from(frames: Vec<Frame>) -> Self {
        Self(frames)
    }
}

impl FromIterator<Frame> for Frames {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Frame> for Frames {
    fn extend<I: IntoIterator<Item = Frame>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Frames {
    type Item = Frame;
    type IntoIter = std::vec::IntoIter<Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Frames {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn frame(id: &[u8; 4], data: &[u8]) -> Frame {
        Frame {
            id: FrameId::new(*id),
            version: Version::V24,
            flags: FrameFlags::NONE,
            data: data.to_vec(),
        }
    }

    #[test]
    fn lookup_returns_last_duplicate() {
        let frames: Frames = [
            frame(b"TIT2", b"\x00first"),
            frame(b"TPE1", b"\x00artist"),
            frame(b"TIT2", b"\x00second"),
        ]
        .into_iter()
        .collect();

        let found = frames.lookup(FrameId::new(*b"TIT2")).unwrap();
        assert_eq!(found.data, b"\x00second");
        assert!(frames.lookup(FrameId::new(*b"TALB")).is_none());
    }

    #[test]
    fn preserves_stream_order() {
        let mut frames = Frames::new();
        frames.push(frame(b"TPE1", b""));
        frames.push(frame(b"TALB", b""));
        let ids: Vec<_> = frames.iter().map(|f| f.id.to_string()).collect();
        assert_eq!(ids, ["TPE1", "TALB"]);
    }

    #[test]
    fn display_escapes_payload() {
        assert_snapshot!(
            frame(b"TIT2", b"\x00Test").to_string(),
            @r#"Frame{ID: TIT2, Version: v2.4, Flags: 0x0000, Data: 5:"\x00Test"}"#
        );
    }

    #[test]
    fn display_escapes_non_ascii_bytewise() {
        assert_snapshot!(
            frame(b"TIT2", "\u{3}Café".as_bytes()).to_string(),
            @r#"Frame{ID: TIT2, Version: v2.4, Flags: 0x0000, Data: 6:"\x03Caf\xc3\xa9"}"#
        );
    }

    #[test]
    fn display_truncates_long_payload() {
        let shown = frame(b"PRIV", &[b'a'; 200]).to_string();
        assert!(shown.starts_with("Frame{ID: PRIV, Version: v2.4, Flags: 0x0000, Data: 200:\""));
        assert!(shown.ends_with(&format!("{}\"...}}", "a".repeat(128))));
    }
}
