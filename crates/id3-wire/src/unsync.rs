/// Undo unsynchronisation.
///
/// Writers insert a `0x00` after every `0xFF` so that no byte pair in the
/// tag looks like an MPEG sync word (`0xFF 0xEx`) or a false tag magic.
/// Reading reverses that: every `0x00` directly following a `0xFF` is
/// dropped.
///
/// ```text
///   FF 00 AB  ->  FF AB
///   FF 00 00  ->  FF 00
///   FF AB     ->  FF AB
/// ```
#[must_use]
pub fn decode_unsync(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    decode_unsync_into(src, &mut out);
    out
}

/// Like [`decode_unsync`], appending to an existing buffer.
pub fn decode_unsync_into(src: &[u8], out: &mut Vec<u8>) {
    let mut bytes = src.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        out.push(b);
        if b == 0xFF {
            bytes.next_if_eq(&0x00u8);
        }
    }
}
