use tokio::io::{AsyncRead, AsyncReadExt};

use crate::buffer::{ScanBuffer, Step};
use crate::config::ScanConfig;
use crate::error::DecodeError;
use crate::frame::Frames;
use crate::tag::DecodedTag;

/// Asynchronous scanner over any `AsyncRead` source.
///
/// Same tokenizer, buffer and results as the blocking
/// [`Scanner`](crate::Scanner); only the reads are awaited. Useful when
/// the audio comes from a socket or an HTTP body and only the tags are
/// wanted.
///
/// # Example
///
/// ```rust,no_run
/// use id3_decoder::AsyncScanner;
/// use tokio::io::AsyncRead;
///
/// async fn count_frames(reader: impl AsyncRead + Unpin) -> usize {
///     let mut scanner = AsyncScanner::new(reader);
///     let mut count = 0;
///     while let Some(tag) = scanner.next().await.transpose().unwrap() {
///         count += tag.frames.len();
///     }
///     count
/// }
/// ```
#[derive(Debug)]
pub struct AsyncScanner<R> {
    reader: R,
    state: ScanBuffer,
}

impl<R: AsyncRead + Unpin> AsyncScanner<R> {
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

    /// Read up to the next tag.
    ///
    /// Returns `Some(Ok(tag))` for each decoded tag, `None` at the end of
    /// the stream, and `Some(Err(_))` at most once, after which the scanner
    /// is finished.
    pub async fn next(&mut self) -> Option<Result<DecodedTag, DecodeError>> {
        loop {
            match self.state.poll() {
                Ok(Step::Tag(tag)) => return Some(Ok(tag)),
                Ok(Step::Read) => match self.reader.read(self.state.read_window()).await {
                    Ok(n) => self.state.commit(n),
                    Err(err) => return Some(Err(self.state.fail(err.into()))),
                },
                Ok(Step::Finished) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Async counterpart of [`scan`](crate::scan).
///
/// # Errors
///
/// The first [`DecodeError`] encountered.
pub async fn scan_async<R: AsyncRead + Unpin>(reader: R) -> Result<Frames, DecodeError> {
    let mut scanner = AsyncScanner::new(reader);
    let mut frames = Frames::new();

    while let Some(tag) = scanner.next().await {
        frames.extend(tag?.frames);
    }

    Ok(frames)
}
