use id3_wire::WireError;

/// Errors that abort a scan.
///
/// Only failures inside a recognised tag block end up here. Candidates
/// that merely look like a tag (bad detection pattern, unsupported
/// version, unknown flags) are skipped without an error.
///
/// ```text
///   DecodeError
///   ├── IncompleteTag            ← stream ended inside a tag candidate
///   ├── TagTooLarge              ← tag exceeds ScanConfig::max_tag_size
///   ├── InvalidHeader(WireError) ← emitted block failed re-validation
///   ├── PaddingWithFooter        ← bytes after the last frame with a footer
///   ├── InvalidPadding           ← non-zero byte in the padding region
///   ├── Wire(WireError)          ← footer, extended header, frame header
///   └── Io(std::io::Error)       ← from the underlying reader
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The stream ended before a detected tag could be read in full.
    ///
    /// `offset` is the stream position of the candidate's "ID3" magic.
    #[error("incomplete tag at offset {offset}")]
    IncompleteTag { offset: u64 },

    /// The tag would need more buffer than the configured limit.
    #[error("tag of {len} bytes exceeds the {limit}-byte buffer limit")]
    TagTooLarge { len: usize, limit: usize },

    /// A block emitted by the tokenizer did not parse as a tag header.
    ///
    /// The tokenizer only emits blocks whose header it has validated,
    /// so this indicates the two disagree.
    #[error("invalid header: {0}")]
    InvalidHeader(WireError),

    /// A tag with a footer had bytes left after its last frame.
    ///
    /// Padding and footer are mutually exclusive.
    #[error("padding with footer ({len} bytes)")]
    PaddingWithFooter { len: usize },

    /// A non-zero byte where only padding may appear.
    ///
    /// `offset` is relative to the start of the tag block.
    #[error("invalid padding at tag offset {offset}")]
    InvalidPadding { offset: usize },

    /// Structural failure reported by `id3-wire`: invalid footer,
    /// extended header size, frame id, or frame size.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// An I/O error from the underlying reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors from interpreting one frame's payload as text.
///
/// These never affect the scan result; each call to
/// [`decode_text`](crate::decode_text) fails or succeeds on its own.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The frame has no payload, so not even an encoding byte.
    #[error("frame data is empty")]
    EmptyFrame,

    /// Compression, encryption, grouping or a data length indicator is set.
    #[error("encoding frame flags are not supported ({flags:#06X})")]
    UnsupportedFrameEncodingFlags { flags: u16 },

    /// The first payload byte is not one of the four text encodings.
    #[error("frame uses unsupported encoding {encoding:#04X}")]
    UnsupportedEncoding { encoding: u8 },

    /// UTF-16 text that must start with a byte order mark does not.
    #[error("frame has invalid text data: missing byte order mark")]
    MissingByteOrderMark,

    /// A comment frame shorter than its language prefix.
    #[error("frame has invalid text data: {len} bytes is too short")]
    Truncated { len: usize },

    /// UTF-8 text that is not valid UTF-8.
    #[error("frame has invalid text data: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
