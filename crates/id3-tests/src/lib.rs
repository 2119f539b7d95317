//! Fixture builders shared by the integration tests and benchmarks.
//!
//! [`TagBuilder`] writes well-formed (or deliberately malformed) tag
//! blocks byte by byte, so tests do not depend on checked-in binaries.
//!
//! ```text
//! TagBuilder::v24()
//!     .frame(FrameSpec::utf8(b"TIT2", "Intro"))
//!     .padding(32)
//!     .build()
//!   → "ID3" 04 00 00 <size> "TIT2" <size> 00 00 03 "Intro" 00 × 32
//! ```

use std::io::{self, Read};

use id3_wire::syncsafe::encode_syncsafe;

/// Syncsafe encoding of `n`.
///
/// # Panics
///
/// If `n` does not fit in 28 bits.
#[must_use]
pub fn syncsafe(n: usize) -> [u8; 4] {
    u32::try_from(n)
        .ok()
        .and_then(encode_syncsafe)
        .unwrap_or_else(|| panic!("{n} does not fit a syncsafe integer"))
}

/// Decode a hex fixture, ignoring whitespace.
///
/// # Panics
///
/// On malformed hex.
#[must_use]
pub fn hex_bytes(text: &str) -> Vec<u8> {
    let compact: String = text.split_whitespace().collect();
    hex::decode(&compact).unwrap_or_else(|e| panic!("bad hex fixture {text:?}: {e}"))
}

/// Insert `00` after every `FF`, the inverse of resynchronisation.
#[must_use]
pub fn unsynchronise(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 8);
    for &b in data {
        out.push(b);
        if b == 0xFF {
            out.push(0x00);
        }
    }
    out
}

/// One frame to be written by [`TagBuilder`].
#[derive(Clone, Debug)]
pub struct FrameSpec {
    id: [u8; 4],
    flags: u16,
    payload: Vec<u8>,
    raw_size: Option<[u8; 4]>,
}

impl FrameSpec {
    pub fn new(id: &[u8; 4], payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: *id,
            flags: 0,
            payload: payload.into(),
            raw_size: None,
        }
    }

    /// Text frame, encoding byte `0x00` followed by `text` and a terminator.
    /// Characters above U+00FF are not representable and panic.
    #[must_use]
    pub fn latin1(id: &[u8; 4], text: &str) -> Self {
        let mut payload = vec![0x00];
        payload.extend(text.chars().map(|c| {
            u8::try_from(u32::from(c)).unwrap_or_else(|_| panic!("{c:?} is not Latin-1"))
        }));
        payload.push(0);
        Self::new(id, payload)
    }

    /// Text frame, encoding byte `0x03`.
    #[must_use]
    pub fn utf8(id: &[u8; 4], text: &str) -> Self {
        let mut payload = vec![0x03];
        payload.extend_from_slice(text.as_bytes());
        Self::new(id, payload)
    }

    /// Text frame, encoding byte `0x01` with a little-endian BOM.
    #[must_use]
    pub fn utf16(id: &[u8; 4], text: &str) -> Self {
        let mut payload = vec![0x01, 0xFF, 0xFE];
        payload.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
        payload.extend_from_slice(&[0, 0]);
        Self::new(id, payload)
    }

    /// Comment frame: encoding, language, empty description, text.
    #[must_use]
    pub fn comment(text: &str) -> Self {
        let mut payload = vec![0x01];
        payload.extend_from_slice(b"eng");
        payload.extend_from_slice(&[0xFE, 0xFF]);
        payload.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        payload.push(0);
        Self::new(b"COMM", payload)
    }

    #[must_use]
    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Write these four bytes as the size field instead of the real size.
    #[must_use]
    pub fn with_raw_size(mut self, size: [u8; 4]) -> Self {
        self.raw_size = Some(size);
        self
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Builder for a complete tag block.
#[derive(Clone, Debug)]
pub struct TagBuilder {
    major: u8,
    revision: u8,
    flags: u8,
    extended_header: Option<Vec<u8>>,
    frames: Vec<FrameSpec>,
    padding: Vec<u8>,
}

impl TagBuilder {
    #[must_use]
    pub fn v23() -> Self {
        Self::with_version(3)
    }

    #[must_use]
    pub fn v24() -> Self {
        Self::with_version(4)
    }

    /// A header with an arbitrary major version byte.
    #[must_use]
    pub fn with_version(major: u8) -> Self {
        Self {
            major,
            revision: 0,
            flags: 0,
            extended_header: None,
            frames: Vec::new(),
            padding: Vec::new(),
        }
    }

    #[must_use]
    pub fn frame(mut self, frame: FrameSpec) -> Self {
        self.frames.push(frame);
        self
    }

    #[must_use]
    pub fn padding(mut self, len: usize) -> Self {
        self.padding = vec![0; len];
        self
    }

    /// Bytes written where padding goes, zero or not.
    #[must_use]
    pub fn raw_padding(mut self, bytes: &[u8]) -> Self {
        self.padding = bytes.to_vec();
        self
    }

    /// Set the tag-level unsynchronisation flag. Frame payloads are
    /// written unsynchronised, as are v2.4 frames flagged `0x0002`.
    #[must_use]
    pub fn unsynchronised(mut self) -> Self {
        self.flags |= 0x80;
        self
    }

    /// Add an extended header with the given content after its size field.
    #[must_use]
    pub fn extended_header(mut self, content: &[u8]) -> Self {
        self.flags |= 0x40;
        self.extended_header = Some(content.to_vec());
        self
    }

    #[must_use]
    pub fn footer(mut self) -> Self {
        self.flags |= 0x10;
        self
    }

    /// Overwrite the header flags byte.
    #[must_use]
    pub fn raw_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    /// Serialize the tag block.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();

        if let Some(content) = &self.extended_header {
            if self.major == 4 {
                body.extend_from_slice(&syncsafe(content.len() + 4));
            } else {
                body.extend_from_slice(&be_size(content.len()));
            }
            body.extend_from_slice(content);
        }

        for frame in &self.frames {
            let frame_unsync = self.major == 4 && frame.flags & 0x0002 != 0;
            let payload = if self.flags & 0x80 != 0 || frame_unsync {
                unsynchronise(&frame.payload)
            } else {
                frame.payload.clone()
            };

            let size = frame.raw_size.unwrap_or_else(|| {
                if self.major == 4 {
                    syncsafe(payload.len())
                } else {
                    be_size(payload.len())
                }
            });

            body.extend_from_slice(&frame.id);
            body.extend_from_slice(&size);
            body.extend_from_slice(&frame.flags.to_be_bytes());
            body.extend_from_slice(&payload);
        }

        body.extend_from_slice(&self.padding);

        let mut header = vec![b'I', b'D', b'3', self.major, self.revision, self.flags];
        header.extend_from_slice(&syncsafe(body.len()));

        let mut block = header.clone();
        block.extend_from_slice(&body);
        if self.flags & 0x10 != 0 {
            block.extend_from_slice(b"3DI");
            block.extend_from_slice(&header[3..]);
        }
        block
    }
}

fn be_size(n: usize) -> [u8; 4] {
    u32::try_from(n)
        .unwrap_or_else(|_| panic!("{n} does not fit a frame size"))
        .to_be_bytes()
}

/// A reader that returns at most `chunk` bytes per call.
#[derive(Debug)]
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> ChunkedReader<'a> {
    /// # Panics
    ///
    /// If `chunk` is zero.
    #[must_use]
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        assert!(chunk > 0, "chunk size must be positive");
        Self { data, chunk }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        let (head, tail) = self.data.split_at(n);
        buf[..n].copy_from_slice(head);
        self.data = tail;
        Ok(n)
    }
}

/// `len` bytes that look like MPEG audio and contain no "ID3".
#[must_use]
pub fn audio(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| match i % 4 {
            0 => 0xFF,
            1 => 0xFB,
            _ => u8::try_from(i * 31 % 0x80).unwrap_or_default(),
        })
        .collect()
}
