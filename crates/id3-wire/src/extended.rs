use crate::error::WireError;
use crate::header::Version;
use crate::syncsafe::{array_at, decode_syncsafe};

/// Total length of the extended header at the start of `body`.
///
/// The size field differs between versions:
///
/// ```text
///   v2.4: syncsafe u32, counts the whole extended header
///   v2.3: big-endian u32, excludes its own 4 bytes
/// ```
///
/// The contents are not interpreted; callers skip the returned range.
///
/// # Errors
///
/// [`WireError::InvalidExtendedHeaderSize`] if the size field is missing,
/// not syncsafe (v2.4), or points past the end of `body`.
pub fn extended_header_len(version: Version, body: &[u8]) -> Result<usize, WireError> {
    let raw: [u8; 4] =
        array_at(body, 0).map_err(|_| WireError::InvalidExtendedHeaderSize)?;

    let len = match version {
        Version::V24 => decode_syncsafe(raw),
        Version::V23 => u32::from_be_bytes(raw).checked_add(4),
    }
    .ok_or(WireError::InvalidExtendedHeaderSize)?;

    let len = len as usize;
    if body.len() < len {
        return Err(WireError::InvalidExtendedHeaderSize);
    }

    Ok(len)
}
