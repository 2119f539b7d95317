use crate::error::WireError;

/// Largest value a syncsafe integer can carry: 28 usable bits.
pub const SYNCSAFE_MAX: u32 = (1 << 28) - 1;

/// Decode a 4-byte syncsafe integer.
///
/// Each byte contributes its low 7 bits, most significant byte first.
/// Returns `None` if any byte has its MSB set, which can never be the
/// result of a valid encoding.
///
/// | Bytes                  | Value       |
/// |------------------------|-------------|
/// | `00 00 00 00`          | 0           |
/// | `00 00 00 7F`          | 127         |
/// | `00 00 01 00`          | 128         |
/// | `7F 7F 7F 7F`          | 268 435 455 |
/// | `00 00 00 80`          | invalid     |
#[must_use]
pub fn decode_syncsafe(bytes: [u8; 4]) -> Option<u32> {
    if bytes.iter().any(|&b| b & 0x80 != 0) {
        return None;
    }

    Some(
        u32::from(bytes[0]) << 21
            | u32::from(bytes[1]) << 14
            | u32::from(bytes[2]) << 7
            | u32::from(bytes[3]),
    )
}

/// Encode `value` as a syncsafe integer, or `None` if it needs more
/// than 28 bits.
#[must_use]
pub fn encode_syncsafe(value: u32) -> Option<[u8; 4]> {
    if value > SYNCSAFE_MAX {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    Some([
        (value >> 21) as u8 & 0x7F,
        (value >> 14) as u8 & 0x7F,
        (value >> 7) as u8 & 0x7F,
        value as u8 & 0x7F,
    ])
}

/// Copy `N` bytes starting at `offset` out of `buf`.
pub(crate) fn array_at<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N], WireError> {
    offset
        .checked_add(N)
        .and_then(|end| buf.get(offset..end))
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(WireError::UnexpectedEof { offset: buf.len() })
}
