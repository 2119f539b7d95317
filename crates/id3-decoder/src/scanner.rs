use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::buffer::{ScanBuffer, Step};
use crate::config::ScanConfig;
use crate::error::DecodeError;
use crate::frame::Frames;
use crate::tag::DecodedTag;

/// Blocking scanner over any [`Read`] source.
///
/// Yields one [`DecodedTag`] per valid tag block, in stream order. Bytes
/// between tags (audio data, false "ID3" matches, tags of unsupported
/// versions) are skipped. The first error ends the iteration.
///
/// The reader is read in chunks into a buffer borrowed from the global
/// [`pool`](crate::pool); wrapping it in a `BufReader` gains nothing.
///
/// # Example
///
/// ```rust,no_run
/// use id3_decoder::Scanner;
///
/// let file = std::fs::File::open("song.mp3")?;
/// for tag in Scanner::new(file) {
///     let tag = tag?;
///     println!("{} tag at {}: {} frames", tag.header.version, tag.offset, tag.frames.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Scanner<R> {
    reader: R,
    state: ScanBuffer,
}

impl<R: Read> Scanner<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &ScanConfig::default())
    }

    #[must_use]
    pub fn with_config(reader: R, config: &ScanConfig) -> Self {
        Self {
            reader,
            state: ScanBuffer::new(config),
        }
    }

    /// Stream offset of the first byte the scanner has not consumed.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.state.position()
    }
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Result<DecodedTag, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state.poll() {
                Ok(Step::Tag(tag)) => return Some(Ok(tag)),
                Ok(Step::Read) => match read_some(&mut self.reader, self.state.read_window()) {
                    Ok(n) => self.state.commit(n),
                    Err(err) => return Some(Err(self.state.fail(err.into()))),
                },
                Ok(Step::Finished) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Scanner<R> {}

fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

/// Read every tag in `reader` and return all their frames in stream
/// order.
///
/// # Errors
///
/// The first [`DecodeError`] encountered; frames decoded before it are
/// discarded.
pub fn scan<R: Read>(reader: R) -> Result<Frames, DecodeError> {
    let mut frames = Frames::new();
    for tag in Scanner::new(reader) {
        frames.extend(tag?.frames);
    }

    Ok(frames)
}

/// [`scan`] over an in-memory buffer.
///
/// # Errors
///
/// See [`scan`].
pub fn scan_bytes(data: &[u8]) -> Result<Frames, DecodeError> {
    scan(data)
}

/// [`scan`] over the file at `path`.
///
/// # Errors
///
/// [`DecodeError::Io`] if the file cannot be opened, otherwise see
/// [`scan`].
pub fn scan_file(path: impl AsRef<Path>) -> Result<Frames, DecodeError> {
    scan(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids;

    const MINIMAL_V24: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00";

    /// v2.3 tag with a single TIT2 frame holding Latin-1 "Test".
    const V23_TITLE: &[u8] = b"ID3\x03\x00\x00\x00\x00\x00\x10\
        TIT2\x00\x00\x00\x06\x00\x00\x00Test\x00";

    #[test]
    fn no_magic_means_no_frames() {
        let frames = scan_bytes(&[0x55; 10_000]).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn minimal_header_consumes_ten_bytes() {
        let mut scanner = Scanner::new(MINIMAL_V24);
        let tag = scanner.next().unwrap().unwrap();
        assert!(tag.frames.is_empty());
        assert_eq!(scanner.position(), 10);
        assert!(scanner.next().is_none());
    }

    #[test]
    fn text_frame_round_trip() {
        let frames = scan_bytes(V23_TITLE).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames.lookup(ids::TIT2).unwrap().text().unwrap(), "Test");
    }

    #[test]
    fn frames_across_tags_keep_order() {
        let mut input = V23_TITLE.to_vec();
        input.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        input.extend_from_slice(V23_TITLE);

        let tags: Vec<_> = Scanner::new(&input[..]).collect::<Result<_, _>>().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].offset, 30);
        assert_eq!(scan_bytes(&input).unwrap().len(), 2);
    }

    #[test]
    fn truncated_tag_is_an_error() {
        let err = scan_bytes(&V23_TITLE[..20]).unwrap_err();
        assert!(matches!(err, DecodeError::IncompleteTag { offset: 0 }));
    }

    #[test]
    fn error_stops_iteration() {
        let mut input = b"ID3\x04\x00\x00\x00\x00\x00\x02\x00\x01".to_vec();
        input.extend_from_slice(MINIMAL_V24);

        let mut scanner = Scanner::new(&input[..]);
        assert!(matches!(
            scanner.next(),
            Some(Err(DecodeError::InvalidPadding { offset: 11 }))
        ));
        assert!(scanner.next().is_none());
    }

    #[test]
    fn io_errors_propagate() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }

        let err = scan(Broken).unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn interrupted_reads_are_retried() {
        struct Flaky<'a> {
            data: &'a [u8],
            interrupt: bool,
        }

        impl Read for Flaky<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.interrupt = !self.interrupt;
                if self.interrupt {
                    return Err(io::ErrorKind::Interrupted.into());
                }
                self.data.read(buf)
            }
        }

        let frames = scan(Flaky {
            data: V23_TITLE,
            interrupt: false,
        })
        .unwrap();
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn missing_file() {
        let err = scan_file("/nonexistent/id3-decoder/song.mp3").unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
    }
}
