use crate::header::RejectReason;

/// Byte-level validation failures.
///
/// Everything in this crate works on in-memory slices, so there is no I/O
/// variant here; the decoder crate adds one when it wraps these errors.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before a fixed-size field could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The first three bytes were not "ID3".
    #[error("invalid magic: expected \"ID3\", got {found:02X?}")]
    InvalidMagic { found: [u8; 3] },

    /// Major version other than 3 or 4.
    #[error("unsupported version 2.{major}.{revision}")]
    UnsupportedVersion { major: u8, revision: u8 },

    /// The header matched the magic but failed the detection pattern
    /// (`$49 44 33 yy yy xx zz zz zz zz`) or carried unknown flags.
    #[error("not an ID3v2 tag: {reason}")]
    NotATag { reason: RejectReason },

    /// Footer magic was not "3DI" or the footer did not mirror the header.
    #[error("invalid footer")]
    InvalidFooter,

    /// Extended header size field was malformed or exceeded the tag body.
    #[error("invalid extended header size")]
    InvalidExtendedHeaderSize,

    /// A frame identifier contained bytes outside `A-Z0-9`.
    #[error("invalid frame id {found:02X?}")]
    InvalidFrameId { found: [u8; 4] },

    /// A v2.4 frame size was not a valid syncsafe integer.
    #[error("invalid frame size")]
    InvalidFrameSize,

    /// A frame claimed more bytes than the tag body has left.
    #[error("frame size {size} exceeds length of tag data ({remaining} bytes remaining)")]
    FrameSizeExceedsTag { size: u32, remaining: usize },
}
