use unicode_normalization::UnicodeNormalization;

use crate::error::TextError;
use crate::frame::Frame;
use crate::frame_ids::ids;

/// Text encodings selected by the first byte of a text payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    /// `0x00`: ISO-8859-1, terminated by `00`.
    Latin1,
    /// `0x01`: UTF-16 with byte order mark, terminated by `00 00`.
    Utf16,
    /// `0x02`: UTF-16 big-endian without byte order mark, terminated by `00 00`.
    Utf16Be,
    /// `0x03`: UTF-8, terminated by `00`.
    Utf8,
}

impl TextEncoding {
    #[must_use]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Self::Latin1),
            0x01 => Some(Self::Utf16),
            0x02 => Some(Self::Utf16Be),
            0x03 => Some(Self::Utf8),
            _ => None,
        }
    }

    /// The terminator stripped from the end of the text, if present.
    fn terminator(self) -> &'static [u8] {
        match self {
            Self::Latin1 | Self::Utf8 => &[0],
            Self::Utf16 | Self::Utf16Be => &[0, 0],
        }
    }
}

/// How a UTF-16 decode treats a leading byte order mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bom {
    /// A BOM must be present and picks the byte order.
    Required,
    /// Big-endian; a leading `FE FF` decodes as U+FEFF like any other unit.
    Ignored,
}

/// Interpret a frame's payload as a string.
///
/// The first payload byte selects the [`TextEncoding`]; one terminator
/// is trimmed from the end.
///
/// `COMM` frames are read differently. Their layout is
/// `encoding(1) language(3) description text`, and enough taggers get the
/// description wrong that the text after the 4-byte prefix is decoded as
/// BOM-marked UTF-16 regardless of the declared encoding, then
/// NFKD-normalized and stripped to printable ASCII.
///
/// # Errors
///
/// - [`TextError::EmptyFrame`] for an empty payload.
/// - [`TextError::UnsupportedFrameEncodingFlags`] if any low-byte frame
///   flag is set (compression, encryption, ...).
/// - [`TextError::UnsupportedEncoding`] for an encoding byte above 3.
/// - [`TextError::InvalidUtf8`] for malformed UTF-8.
/// - [`TextError::MissingByteOrderMark`] for UTF-16 without a BOM where
///   one is required.
/// - [`TextError::Truncated`] for a `COMM` payload under 4 bytes.
pub fn decode_text(frame: &Frame) -> Result<String, TextError> {
    let Some((&encoding_byte, text)) = frame.data.split_first() else {
        return Err(TextError::EmptyFrame);
    };

    let encoding_bits = frame.flags.encoding_bits();
    if encoding_bits != 0 {
        return Err(TextError::UnsupportedFrameEncodingFlags {
            flags: encoding_bits,
        });
    }

    let encoding = TextEncoding::from_byte(encoding_byte).ok_or(TextError::UnsupportedEncoding {
        encoding: encoding_byte,
    })?;

    let trimmed = trim_terminator(text, encoding.terminator());

    match encoding {
        TextEncoding::Utf8 => Ok(String::from_utf8(trimmed.to_vec())?),
        _ if frame.id == ids::COMM => decode_comment(&frame.data),
        TextEncoding::Latin1 => Ok(trimmed.iter().copied().map(char::from).collect()),
        TextEncoding::Utf16 => decode_utf16(trimmed, Bom::Required),
        TextEncoding::Utf16Be => decode_utf16(trimmed, Bom::Ignored),
    }
}

fn decode_comment(data: &[u8]) -> Result<String, TextError> {
    let text = data
        .get(4..)
        .ok_or(TextError::Truncated { len: data.len() })?;
    let decoded = decode_utf16(trim_terminator(text, &[0]), Bom::Required)?;

    Ok(strip_control(&strip_nul(&decoded)))
}

fn trim_terminator<'a>(text: &'a [u8], terminator: &[u8]) -> &'a [u8] {
    text.strip_suffix(terminator).unwrap_or(text)
}

/// Decode UTF-16 bytes. Unpaired surrogates and a dangling odd byte
/// become U+FFFD.
fn decode_utf16(bytes: &[u8], bom: Bom) -> Result<String, TextError> {
    let mut little_endian = false;
    let mut body = bytes;

    if bom == Bom::Required {
        match bytes {
            [0xFE, 0xFF, rest @ ..] => body = rest,
            [0xFF, 0xFE, rest @ ..] => {
                little_endian = true;
                body = rest;
            }
            _ => return Err(TextError::MissingByteOrderMark),
        }
    }

    let chunks = body.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();
    let units = chunks.map(|pair| {
        let pair = [pair[0], pair[1]];
        if little_endian {
            u16::from_le_bytes(pair)
        } else {
            u16::from_be_bytes(pair)
        }
    });

    let mut out: String = char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if dangling {
        out.push(char::REPLACEMENT_CHARACTER);
    }

    Ok(out)
}

/// NFKD-normalize `s` and drop every U+0000.
///
/// ```
/// assert_eq!(id3_decoder::strip_nul("a\0b\0"), "ab");
/// ```
#[must_use]
pub fn strip_nul(s: &str) -> String {
    s.nfkd().filter(|&c| c != '\0').collect()
}

/// Keep printable ASCII only. Decomposing first turns accented letters
/// into their base letter plus a combining mark, and only the mark is
/// dropped.
///
/// ```
/// assert_eq!(id3_decoder::strip_control("Caf\u{e9}\tbar\n"), "Cafebar");
/// ```
#[must_use]
pub fn strip_control(s: &str) -> String {
    s.nfkd().filter(|&c| (' '..'\u{7F}').contains(&c)).collect()
}
