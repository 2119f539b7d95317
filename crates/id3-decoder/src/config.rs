use id3_wire::header::{FOOTER_SIZE, HEADER_SIZE};
use id3_wire::syncsafe::SYNCSAFE_MAX;

/// Largest tag block the format can describe: header, a body of
/// `SYNCSAFE_MAX` bytes, footer.
pub const MAX_TAG_SIZE: usize = HEADER_SIZE + SYNCSAFE_MAX as usize + FOOTER_SIZE;

/// Configuration for [`Scanner`](crate::Scanner) and
/// [`AsyncScanner`](crate::AsyncScanner).
///
/// ```text
/// ┌──────────────────┬─────────────────────────────────────────────────┐
/// │ Field            │ Purpose                                         │
/// ├──────────────────┼─────────────────────────────────────────────────┤
/// │ initial_capacity │ Scratch buffer size requested from the pool     │
/// │ max_tag_size     │ Largest tag block the scanner will buffer       │
/// └──────────────────┴─────────────────────────────────────────────────┘
/// ```
///
/// The buffer grows on demand up to `max_tag_size`. A tag whose declared
/// length exceeds it fails the scan with
/// [`DecodeError::TagTooLarge`](crate::DecodeError::TagTooLarge) instead
/// of allocating. Lower the limit when scanning untrusted input in
/// memory-constrained processes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Bytes requested from the buffer pool up front.
    pub initial_capacity: usize,

    /// Largest tag block, header and footer included, that may be buffered.
    pub max_tag_size: usize,
}

impl Default for ScanConfig {
    /// 4 KiB initial buffer; the limit admits every tag the format can
    /// express.
    fn default() -> Self {
        Self {
            initial_capacity: 4 << 10,
            max_tag_size: MAX_TAG_SIZE,
        }
    }
}
