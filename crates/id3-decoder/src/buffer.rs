use std::fmt;

use id3_wire::header::HEADER_SIZE;
use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::error::DecodeError;
use crate::pool::{self, PooledBuffer};
use crate::tag::{DecodedTag, decode_tag};
use crate::tokenizer::{Split, locate};

/// What a scanner must do after [`ScanBuffer::poll`].
#[derive(Debug)]
pub(crate) enum Step {
    /// A tag was decoded.
    Tag(DecodedTag),

    /// Fill [`ScanBuffer::read_window`] from the reader, then
    /// [`commit`](ScanBuffer::commit) the byte count.
    Read,

    /// End of stream, or the scan already failed.
    Finished,
}

/// Scan state shared by the blocking and async scanners.
///
/// Owns the pooled buffer and drives the tokenizer over it; the scanners
/// only move bytes from their reader into [`read_window`](Self::read_window).
///
/// ```text
///   buf: [ consumed | window: start..end | spare: end..len ]
///                     ▲
///                     stream offset `offset`
/// ```
pub(crate) struct ScanBuffer {
    buf: PooledBuffer<'static>,
    start: usize,
    end: usize,
    /// Stream offset of `buf[start]`.
    offset: u64,
    /// Window length the tokenizer asked for.
    needed: usize,
    read_size: usize,
    max_tag_size: usize,
    eof: bool,
    done: bool,
}

impl fmt::Debug for ScanBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanBuffer")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("offset", &self.offset)
            .field("buf_len", &self.buf.len())
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl ScanBuffer {
    pub(crate) fn new(config: &ScanConfig) -> Self {
        Self {
            buf: pool::global().acquire(config.initial_capacity),
            start: 0,
            end: 0,
            offset: 0,
            needed: 0,
            read_size: config.initial_capacity.max(HEADER_SIZE),
            max_tag_size: config.max_tag_size,
            eof: false,
            done: false,
        }
    }

    /// Stream offset of the first byte not yet consumed.
    pub(crate) fn position(&self) -> u64 {
        self.offset
    }

    /// Advance the scan as far as the buffered bytes allow.
    ///
    /// Once an error is returned, every later call returns
    /// [`Step::Finished`].
    pub(crate) fn poll(&mut self) -> Result<Step, DecodeError> {
        if self.done {
            return Ok(Step::Finished);
        }

        self.poll_inner().map_err(|err| self.fail(err))
    }

    fn poll_inner(&mut self) -> Result<Step, DecodeError> {
        loop {
            let window = &self.buf[self.start..self.end];
            let split = locate(window, self.eof).map_err(DecodeError::InvalidHeader)?;

            match split {
                Split::Tag { start, len, .. } => {
                    self.check_limit(len)?;
                    let offset = self.offset + start as u64;
                    let tag = decode_tag(&window[start..start + len], offset)?;
                    self.consume(split.advance());
                    return Ok(Step::Tag(tag));
                }
                Split::Skip { start, reason } => {
                    debug!(offset = self.offset + start as u64, %reason, "skipped tag candidate");
                    self.consume(split.advance());
                }
                Split::NeedMore { advance, needed } => {
                    self.consume(advance);
                    if self.eof {
                        self.done = true;
                        return Ok(Step::Finished);
                    }

                    let needed = needed.unwrap_or(0);
                    self.check_limit(needed)?;
                    self.needed = needed;
                    return Ok(Step::Read);
                }
                Split::Incomplete { start } => {
                    return Err(DecodeError::IncompleteTag {
                        offset: self.offset + start as u64,
                    });
                }
            }
        }
    }

    /// Tags over the limit fail whether or not they happen to be fully
    /// buffered already, so the outcome does not depend on read sizes.
    fn check_limit(&self, len: usize) -> Result<(), DecodeError> {
        if len > self.max_tag_size {
            return Err(DecodeError::TagTooLarge {
                len,
                limit: self.max_tag_size,
            });
        }
        Ok(())
    }

    /// Spare space to read into, after compacting the window to the
    /// front of the buffer. Never empty.
    ///
    /// A full buffer at least doubles, capped at the length the tokenizer
    /// asked for. The declared size of a tag is never allocated up front,
    /// so memory stays within about twice the bytes actually received.
    pub(crate) fn read_window(&mut self) -> &mut [u8] {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        if self.end == self.buf.len() {
            let mut want = (2 * self.buf.len()).max(self.end + self.read_size);
            if self.needed > self.end {
                want = want.min(self.needed);
            }
            trace!(from = self.buf.len(), to = want, "growing scan buffer");
            self.buf.resize(want, 0);
        }

        &mut self.buf[self.end..]
    }

    /// Record `n` bytes read into [`read_window`](Self::read_window).
    /// Zero marks the end of the stream.
    pub(crate) fn commit(&mut self, n: usize) {
        if n == 0 {
            self.eof = true;
        } else {
            self.end += n;
        }
    }

    /// Stop the scan with `err`.
    pub(crate) fn fail(&mut self, err: DecodeError) -> DecodeError {
        self.done = true;
        err
    }

    fn consume(&mut self, n: usize) {
        self.start += n;
        self.offset += n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `input` in `chunk`-sized reads and collect every step.
    fn drive(input: &[u8], chunk: usize, config: &ScanConfig) -> Vec<Result<DecodedTag, String>> {
        let mut state = ScanBuffer::new(config);
        let mut rest = input;
        let mut out = Vec::new();

        loop {
            match state.poll() {
                Ok(Step::Tag(tag)) => out.push(Ok(tag)),
                Ok(Step::Read) => {
                    let window = state.read_window();
                    let n = chunk.min(window.len()).min(rest.len());
                    window[..n].copy_from_slice(&rest[..n]);
                    rest = &rest[n..];
                    state.commit(n);
                }
                Ok(Step::Finished) => return out,
                Err(err) => out.push(Err(err.to_string())),
            }
        }
    }

    const MINIMAL_V24: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00";

    #[test]
    fn empty_input_finishes() {
        assert!(drive(b"", 1, &ScanConfig::default()).is_empty());
    }

    #[test]
    fn offsets_are_stream_positions() {
        let mut input = vec![0xAA; 5000];
        input.extend_from_slice(MINIMAL_V24);
        input.extend_from_slice(b"ID");
        input.extend_from_slice(MINIMAL_V24);

        for chunk in [1, 7, 4096, usize::MAX] {
            let tags = drive(&input, chunk, &ScanConfig::default());
            let offsets: Vec<_> = tags.iter().map(|t| t.as_ref().unwrap().offset).collect();
            assert_eq!(offsets, [5000, 5012], "chunk {chunk}");
        }
    }

    #[test]
    fn error_fuses_the_scan() {
        let mut state = ScanBuffer::new(&ScanConfig::default());
        let window = state.read_window();
        window[..5].copy_from_slice(b"ID3\x04\x00");
        state.commit(5);
        state.commit(0);

        assert!(matches!(
            state.poll(),
            Err(DecodeError::IncompleteTag { offset: 0 })
        ));
        assert!(matches!(state.poll(), Ok(Step::Finished)));
    }

    #[test]
    fn tag_over_limit_is_refused() {
        let config = ScanConfig {
            initial_capacity: 16,
            max_tag_size: 64,
        };
        let input = b"ID3\x04\x00\x00\x00\x00\x01\x00";
        let steps = drive(input, usize::MAX, &config);
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].as_ref().unwrap_err(),
            "tag of 138 bytes exceeds the 64-byte buffer limit"
        );
    }

    #[test]
    fn limit_applies_to_buffered_tags() {
        let config = ScanConfig {
            initial_capacity: 4096,
            max_tag_size: 12,
        };
        let mut input = b"ID3\x04\x00\x00\x00\x00\x00\x05".to_vec();
        input.extend_from_slice(&[0; 5]);

        for chunk in [1, usize::MAX] {
            let steps = drive(&input, chunk, &config);
            assert_eq!(
                steps[0].as_ref().unwrap_err(),
                "tag of 15 bytes exceeds the 12-byte buffer limit"
            );
        }
    }

    /// Header of a v2.4 tag declaring the largest representable body.
    const HUGE_V24: &[u8] = b"ID3\x04\x00\x00\x7F\x7F\x7F\x7F";

    #[test]
    fn declared_size_is_not_allocated_up_front() {
        let mut state = ScanBuffer::new(&ScanConfig::default());
        assert!(matches!(state.poll(), Ok(Step::Read)));
        state.read_window()[..HUGE_V24.len()].copy_from_slice(HUGE_V24);
        state.commit(HUGE_V24.len());

        assert!(matches!(state.poll(), Ok(Step::Read)));
        let spare = state.read_window().len();
        assert!(spare + HUGE_V24.len() <= 8192, "buffer grew to {}", state.buf.len());

        state.commit(0);
        assert!(matches!(
            state.poll(),
            Err(DecodeError::IncompleteTag { offset: 0 })
        ));
    }

    #[test]
    fn buffer_grows_with_received_bytes() {
        let mut input = HUGE_V24.to_vec();
        input.resize(100_000, 0);

        let mut state = ScanBuffer::new(&ScanConfig::default());
        let mut received = 0;
        while received < input.len() {
            assert!(matches!(state.poll(), Ok(Step::Read)));
            let window = state.read_window();
            let n = window.len().min(1000).min(input.len() - received);
            window[..n].copy_from_slice(&input[received..received + n]);
            state.commit(n);
            received += n;

            assert!(
                state.buf.len() <= 2 * received.max(4096),
                "{} bytes buffered for {received} received",
                state.buf.len()
            );
        }
    }

    #[test]
    fn growth_stops_at_the_requested_length() {
        let config = ScanConfig {
            initial_capacity: 16,
            ..ScanConfig::default()
        };
        let mut input = b"ID3\x04\x00\x00\x00\x00\x00\x15".to_vec();
        input.resize(31, 0);

        let mut state = ScanBuffer::new(&config);
        let mut rest = &input[..];
        loop {
            match state.poll() {
                Ok(Step::Read) => {
                    let window = state.read_window();
                    let n = window.len().min(rest.len());
                    window[..n].copy_from_slice(&rest[..n]);
                    rest = &rest[n..];
                    state.commit(n);
                }
                Ok(Step::Tag(tag)) => {
                    assert_eq!(tag.padding, 21);
                    break;
                }
                other => panic!("unexpected step {other:?}"),
            }
        }
        assert_eq!(state.buf.len(), 31);
    }

    #[test]
    fn debug_omits_buffer_contents() {
        let mut state = ScanBuffer::new(&ScanConfig::default());
        state.read_window()[..4].copy_from_slice(b"ID3\x04");
        state.commit(4);

        let shown = format!("{state:?}");
        assert!(shown.starts_with("ScanBuffer { start: 0, end: 4, offset: 0, buf_len: 4096"));
        assert!(shown.len() < 200);
    }

    #[test]
    fn tiny_initial_capacity_still_reads() {
        let config = ScanConfig {
            initial_capacity: 0,
            ..ScanConfig::default()
        };
        let tags = drive(MINIMAL_V24, usize::MAX, &config);
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn position_tracks_consumed_bytes() {
        let mut state = ScanBuffer::new(&ScanConfig::default());
        assert!(matches!(state.poll(), Ok(Step::Read)));
        let window = state.read_window();
        window[..MINIMAL_V24.len()].copy_from_slice(MINIMAL_V24);
        state.commit(MINIMAL_V24.len());

        assert!(matches!(state.poll(), Ok(Step::Tag(_))));
        assert_eq!(state.position(), 10);
    }
}
