use std::fmt;

use crate::error::WireError;
use crate::syncsafe::{array_at, decode_syncsafe};

/// Tag magic: ASCII "ID3".
pub const TAG_MAGIC: [u8; 3] = *b"ID3";

/// Footer magic: "ID3" reversed.
pub const FOOTER_MAGIC: [u8; 3] = *b"3DI";

/// Size of the fixed tag header.
pub const HEADER_SIZE: usize = 10;

/// Size of the optional v2.4 footer.
pub const FOOTER_SIZE: usize = 10;

/// Supported ID3v2 major versions.
///
/// The version decides how every size field after the tag header is
/// encoded and which frame flag bits mean what.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    /// ID3v2.3.0
    V23,
    /// ID3v2.4.0
    V24,
}

impl Version {
    /// Map a header major-version byte to a supported version.
    #[must_use]
    pub fn from_major(major: u8) -> Option<Self> {
        match major {
            3 => Some(Self::V23),
            4 => Some(Self::V24),
            _ => None,
        }
    }

    /// The major-version byte as it appears on the wire.
    #[must_use]
    pub fn major(self) -> u8 {
        match self {
            Self::V23 => 3,
            Self::V24 => 4,
        }
    }

    /// Decode a 4-byte size field written under this version.
    ///
    /// v2.4 stores sizes as syncsafe integers (`None` when malformed);
    /// v2.3 stores a plain big-endian `u32`, which always decodes.
    #[must_use]
    pub fn decode_size(self, bytes: [u8; 4]) -> Option<u32> {
        match self {
            Self::V24 => decode_syncsafe(bytes),
            Self::V23 => Some(u32::from_be_bytes(bytes)),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V23 => f.write_str("v2.3"),
            Self::V24 => f.write_str("v2.4"),
        }
    }
}

/// Tag-level flags byte.
///
/// Bit layout:
///   bit 7 = unsynchronisation applied to frame data
///   bit 6 = extended header follows the header
///   bit 5 = experimental indicator
///   bit 4 = footer present (v2.4)
///   bits 0-3 = undefined; a tag using them is not safe to read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TagFlags(u8);

impl TagFlags {
    pub const NONE: Self = Self(0);
    pub const UNSYNCHRONISATION: Self = Self(0b1000_0000);
    pub const EXTENDED_HEADER: Self = Self(0b0100_0000);
    pub const EXPERIMENTAL: Self = Self(0b0010_0000);
    pub const FOOTER: Self = Self(0b0001_0000);

    /// Every bit this decoder understands.
    pub const KNOWN: Self = Self(0b1111_0000);

    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn is_unsynchronised(self) -> bool {
        self.0 & Self::UNSYNCHRONISATION.0 != 0
    }

    pub fn has_extended_header(self) -> bool {
        self.0 & Self::EXTENDED_HEADER.0 != 0
    }

    pub fn is_experimental(self) -> bool {
        self.0 & Self::EXPERIMENTAL.0 != 0
    }

    pub fn has_footer(self) -> bool {
        self.0 & Self::FOOTER.0 != 0
    }

    /// Bits set outside [`TagFlags::KNOWN`].
    pub fn unknown_bits(self) -> u8 {
        self.0 & !Self::KNOWN.0
    }
}

/// Why a 10-byte window starting with "ID3" is not treated as a tag.
///
/// None of these are errors during a scan: the literal bytes "ID3" occur
/// in audio data often enough that a mismatch only means "keep looking".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Version or revision byte was `0xFF`, or the size was not syncsafe.
    SyncPattern,
    /// Major version newer than 4 or older than 3.
    UnsupportedVersion(u8),
    /// Flag bits outside the four defined ones.
    UnknownFlags(u8),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyncPattern => f.write_str("header does not match the detection pattern"),
            Self::UnsupportedVersion(major) => write!(f, "unsupported version 2.{major}"),
            Self::UnknownFlags(bits) => write!(f, "unknown flag bits {bits:#04X}"),
        }
    }
}

/// Outcome of [`TagHeader::probe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    Tag(TagHeader),
    Reject(RejectReason),
}

/// The 10-byte ID3v2 tag header.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────┐
/// │ Offset │ Size    │ Description                      │
/// ├────────┼─────────┼──────────────────────────────────┤
/// │ 0x00   │ 3 bytes │ Magic: "ID3"                     │
/// │ 0x03   │ 1 byte  │ Major version (3 or 4)           │
/// │ 0x04   │ 1 byte  │ Revision                         │
/// │ 0x05   │ 1 byte  │ Flags                            │
/// │ 0x06   │ 4 bytes │ Tag size, syncsafe, excluding    │
/// │        │         │ header and footer                │
/// └────────┴─────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagHeader {
    pub version: Version,
    pub revision: u8,
    pub flags: TagFlags,
    /// Body length: extended header + frames + padding.
    pub size: u32,
}

impl TagHeader {
    /// Classify the 10 bytes at the start of `buf`.
    ///
    /// Checks run in a fixed order: detection pattern, then version, then
    /// flags. The first failing check decides the reject reason.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if `buf` is shorter than 10 bytes.
    /// - [`WireError::InvalidMagic`] if `buf` does not start with "ID3".
    pub fn probe(buf: &[u8]) -> Result<Probe, WireError> {
        let header: [u8; HEADER_SIZE] = array_at(buf, 0)?;

        if header[0..3] != TAG_MAGIC {
            return Err(WireError::InvalidMagic {
                found: [header[0], header[1], header[2]],
            });
        }

        // $49 44 33 yy yy xx zz zz zz zz, yy < $FF, zz < $80
        let size = decode_syncsafe([header[6], header[7], header[8], header[9]]);
        let Some(size) = size.filter(|_| header[3] != 0xFF && header[4] != 0xFF) else {
            return Ok(Probe::Reject(RejectReason::SyncPattern));
        };

        let Some(version) = Version::from_major(header[3]) else {
            return Ok(Probe::Reject(RejectReason::UnsupportedVersion(header[3])));
        };

        let flags = TagFlags::from_raw(header[5]);
        if flags.unknown_bits() != 0 {
            return Ok(Probe::Reject(RejectReason::UnknownFlags(flags.unknown_bits())));
        }

        Ok(Probe::Tag(Self {
            version,
            revision: header[4],
            flags,
            size,
        }))
    }

    /// Parse a header that is expected to be valid.
    ///
    /// # Errors
    ///
    /// Everything [`probe`](Self::probe) reports, plus
    /// [`WireError::UnsupportedVersion`] and [`WireError::NotATag`] for
    /// headers `probe` would have rejected.
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        match Self::probe(buf)? {
            Probe::Tag(header) => Ok(header),
            Probe::Reject(RejectReason::UnsupportedVersion(major)) => {
                Err(WireError::UnsupportedVersion {
                    major,
                    revision: buf[4],
                })
            }
            Probe::Reject(reason) => Err(WireError::NotATag { reason }),
        }
    }

    /// Length of the body following the header, footer excluded.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.size as usize
    }

    /// Total length of the tag block: header, body and footer.
    #[must_use]
    pub fn tag_len(&self) -> usize {
        let footer = if self.flags.has_footer() { FOOTER_SIZE } else { 0 };
        HEADER_SIZE + self.body_len() + footer
    }
}

/// Check that `footer` mirrors `header`.
///
/// The footer repeats header bytes 3..10 (version, revision, flags, size)
/// behind the reversed magic "3DI".
///
/// # Errors
///
/// [`WireError::InvalidFooter`] on any mismatch or a wrong-sized slice.
pub fn verify_footer(header: &[u8], footer: &[u8]) -> Result<(), WireError> {
    if header.len() < HEADER_SIZE || footer.len() != FOOTER_SIZE {
        return Err(WireError::InvalidFooter);
    }

    if footer[0..3] != FOOTER_MAGIC || header[3..HEADER_SIZE] != footer[3..] {
        return Err(WireError::InvalidFooter);
    }

    Ok(())
}
