use std::fmt;
use std::str::FromStr;

use crate::error::WireError;
use crate::header::Version;
use crate::syncsafe::array_at;

/// Size of the fixed frame header: id(4) + size(4) + flags(2).
pub const FRAME_HEADER_SIZE: usize = 10;

const fn is_id_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit()
}

/// `A-Z0-9` in the first three bytes, and the same or a zero byte in the
/// last. The zero is tolerated because some taggers upgrade v2.2 ids
/// ("COM") to v2.3 by padding them instead of mapping them ("COMM").
const fn is_valid_id(bytes: [u8; 4]) -> bool {
    is_id_byte(bytes[0])
        && is_id_byte(bytes[1])
        && is_id_byte(bytes[2])
        && (is_id_byte(bytes[3]) || bytes[3] == 0)
}

/// A four-byte frame identifier such as `TIT2` or `COMM`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId([u8; 4]);

impl FrameId {
    /// Build an identifier from known-good bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not a valid identifier. In a `const` context
    /// this is a compile error.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        assert!(is_valid_id(bytes), "invalid frame id");
        Self(bytes)
    }

    /// Classify the identifier bytes at the start of a frame header.
    ///
    /// Returns `Ok(None)` for four zero bytes, which mark the start of
    /// padding rather than a frame.
    ///
    /// # Errors
    ///
    /// [`WireError::InvalidFrameId`] for anything else outside `A-Z0-9`.
    pub fn parse(bytes: [u8; 4]) -> Result<Option<Self>, WireError> {
        if is_valid_id(bytes) {
            return Ok(Some(Self(bytes)));
        }

        if bytes == [0; 4] {
            return Ok(None);
        }

        Err(WireError::InvalidFrameId { found: bytes })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Whether this is a padded three-character v2.2 identifier.
    #[must_use]
    pub fn is_legacy(self) -> bool {
        self.0[3] == 0
    }

    /// The identifier as text, without the legacy trailing zero.
    #[must_use]
    pub fn as_str(&self) -> &str {
        let len = if self.is_legacy() { 3 } else { 4 };
        // Valid ids are ASCII by construction.
        std::str::from_utf8(&self.0[..len]).unwrap_or_default()
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FrameId").field(&self.as_str()).finish()
    }
}

/// Error returned when parsing a [`FrameId`] from text.
#[derive(Debug, thiserror::Error)]
#[error("frame id must be 3 or 4 characters of A-Z or 0-9, got {0:?}")]
pub struct ParseFrameIdError(String);

impl FromStr for FrameId {
    type Err = ParseFrameIdError;

    /// Accepts `TIT2`, and `COM` as shorthand for the padded legacy form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 4];
        match s.len() {
            3 | 4 => bytes[..s.len()].copy_from_slice(s.as_bytes()),
            _ => return Err(ParseFrameIdError(s.to_string())),
        }

        match Self::parse(bytes) {
            Ok(Some(id)) => Ok(id),
            _ => Err(ParseFrameIdError(s.to_string())),
        }
    }
}

/// Frame-level flags, two bytes after the frame size.
///
/// The bit assignments differ between v2.3 and v2.4, so the constants are
/// prefixed with the version they belong to. Interpreting a flag always
/// needs the [`Version`] the frame was read under.
///
/// ```text
///   bit   v2.3                  v2.4
///   15    tag alter preserv.    -
///   14    file alter preserv.   tag alter preserv.
///   13    read only             file alter preserv.
///   12    -                     read only
///    7    compression           -
///    6    encryption            grouping identity
///    5    grouping identity     -
///    3    -                     compression
///    2    -                     encryption
///    1    -                     unsynchronisation
///    0    -                     data length indicator
/// ```
///
/// The low byte holds the "format" flags. Any of those change how the
/// payload must be read, so text decoding refuses frames that set them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameFlags(u16);

impl FrameFlags {
    pub const NONE: Self = Self(0);

    pub const V24_TAG_ALTER_PRESERVATION: Self = Self(1 << 14);
    pub const V24_FILE_ALTER_PRESERVATION: Self = Self(1 << 13);
    pub const V24_READ_ONLY: Self = Self(1 << 12);
    pub const V24_GROUPING_IDENTITY: Self = Self(1 << 6);
    pub const V24_COMPRESSION: Self = Self(1 << 3);
    pub const V24_ENCRYPTION: Self = Self(1 << 2);
    pub const V24_UNSYNCHRONISATION: Self = Self(1 << 1);
    pub const V24_DATA_LENGTH_INDICATOR: Self = Self(1);

    pub const V23_TAG_ALTER_PRESERVATION: Self = Self(1 << 15);
    pub const V23_FILE_ALTER_PRESERVATION: Self = Self(1 << 14);
    pub const V23_READ_ONLY: Self = Self(1 << 13);
    pub const V23_COMPRESSION: Self = Self(1 << 7);
    pub const V23_ENCRYPTION: Self = Self(1 << 6);
    pub const V23_GROUPING_IDENTITY: Self = Self(1 << 5);

    /// Flags that alter the payload encoding.
    pub const ENCODING_MASK: Self = Self(0x00FF);

    pub fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Bits set in the payload-encoding byte.
    pub fn encoding_bits(self) -> u16 {
        self.0 & Self::ENCODING_MASK.0
    }

    /// Whether this frame's payload carries its own unsynchronisation.
    /// Only v2.4 defines a per-frame flag for it.
    pub fn is_unsynchronised(self, version: Version) -> bool {
        version == Version::V24 && self.contains(Self::V24_UNSYNCHRONISATION)
    }

    /// Names of the set flags under `version`, high bit first. Bits with
    /// no meaning in that version are not listed.
    pub fn names(self, version: Version) -> impl Iterator<Item = &'static str> {
        let table: &'static [(Self, &'static str)] = match version {
            Version::V24 => &[
                (Self::V24_TAG_ALTER_PRESERVATION, "tag-alter-preservation"),
                (Self::V24_FILE_ALTER_PRESERVATION, "file-alter-preservation"),
                (Self::V24_READ_ONLY, "read-only"),
                (Self::V24_GROUPING_IDENTITY, "grouping-identity"),
                (Self::V24_COMPRESSION, "compression"),
                (Self::V24_ENCRYPTION, "encryption"),
                (Self::V24_UNSYNCHRONISATION, "unsynchronisation"),
                (Self::V24_DATA_LENGTH_INDICATOR, "data-length-indicator"),
            ],
            Version::V23 => &[
                (Self::V23_TAG_ALTER_PRESERVATION, "tag-alter-preservation"),
                (Self::V23_FILE_ALTER_PRESERVATION, "file-alter-preservation"),
                (Self::V23_READ_ONLY, "read-only"),
                (Self::V23_COMPRESSION, "compression"),
                (Self::V23_ENCRYPTION, "encryption"),
                (Self::V23_GROUPING_IDENTITY, "grouping-identity"),
            ],
        };

        table
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|&(_, name)| name)
    }
}

/// Frame header preceding every frame payload.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ id      (4 bytes, A-Z0-9)                        │
/// │ size    (4 bytes, syncsafe in v2.4, plain in 2.3)│
/// │ flags   (2 bytes, big-endian)                    │
/// │ payload [size bytes]                             │
/// └──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    pub id: FrameId,
    /// Payload length as declared, before any unsynchronisation is undone.
    pub size: u32,
    pub flags: FrameFlags,
}

impl FrameHeader {
    /// Read the frame header at the start of `buf`, which holds the rest
    /// of the tag body.
    ///
    /// # Returns
    ///
    /// `Some(header)` for a frame whose payload fits in `buf`, or `None`
    /// if the id is all zeroes (padding starts here).
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if `buf` is shorter than 10 bytes.
    /// - [`WireError::InvalidFrameId`] for ids outside `A-Z0-9`.
    /// - [`WireError::InvalidFrameSize`] for a malformed v2.4 size.
    /// - [`WireError::FrameSizeExceedsTag`] if the payload runs past `buf`.
    pub fn read_from(buf: &[u8], version: Version) -> Result<Option<Self>, WireError> {
        let Some(id) = FrameId::parse(array_at(buf, 0)?)? else {
            return Ok(None);
        };

        let size = version
            .decode_size(array_at(buf, 4)?)
            .ok_or(WireError::InvalidFrameSize)?;

        let flags = FrameFlags::from_raw(u16::from_be_bytes(array_at(buf, 8)?));

        if (buf.len() as u64) < FRAME_HEADER_SIZE as u64 + u64::from(size) {
            return Err(WireError::FrameSizeExceedsTag {
                size,
                remaining: buf.len(),
            });
        }

        Ok(Some(Self { id, size, flags }))
    }

    /// Bytes occupied on the wire: header plus declared payload.
    #[must_use]
    pub fn frame_len(&self) -> usize {
        FRAME_HEADER_SIZE + self.size as usize
    }
}
