#![no_main]

use std::io::{self, Read};

use id3_decoder::{DecodeError, DecodedTag, Scanner};
use libfuzzer_sys::fuzz_target;

struct Chunked<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn scan(data: &[u8], chunk: usize) -> Result<Vec<DecodedTag>, String> {
    Scanner::new(Chunked { data, chunk })
        .collect::<Result<Vec<_>, DecodeError>>()
        .map_err(|e| e.to_string())
}

// Fuzz target: the scan result must not depend on read sizes.
//
// The first byte picks the chunk size; the rest is the stream.
fuzz_target!(|data: &[u8]| {
    let Some((&chunk, stream)) = data.split_first() else {
        return;
    };
    let chunk = usize::from(chunk % 32) + 1;

    assert_eq!(scan(stream, chunk), scan(stream, stream.len().max(1)));
});
