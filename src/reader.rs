// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

//! Stream reader for the CRUSH block container.

use std::io::{self, Read};

use crate::constants::*;
use crate::depack::depack_from_stream;

/// Reader decompresses data from the CRUSH block container.
///
/// Blocks are read lazily: each 4-byte length header is followed by the
/// packed bytes, which carry no length field of their own, so the
/// decoder consumes exactly the bytes the bit stream needs and the next
/// header is expected immediately after.
///
/// # Example
///
/// ```
/// use crushpack::{Reader, Writer};
/// use std::io::{Read, Write};
///
/// let mut compressed = Vec::new();
/// {
///     let mut writer = Writer::new(&mut compressed);
///     writer.write_all(b"Hello, World!").unwrap();
///     writer.flush().unwrap();
/// }
///
/// let mut reader = Reader::new(&compressed[..]);
/// let mut decompressed = Vec::new();
/// reader.read_to_end(&mut decompressed).unwrap();
///
/// assert_eq!(decompressed, b"Hello, World!");
/// ```
pub struct Reader<R: Read> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    eof: bool,
    max_block_size: usize,
}

impl<R: Read> Reader<R> {
    /// Create a new Reader accepting blocks up to the 64 MiB maximum.
    pub fn new(reader: R) -> Self {
        Reader {
            reader,
            buf: Vec::new(),
            pos: 0,
            eof: false,
            max_block_size: MAX_BLOCK_SIZE,
        }
    }

    /// Create a new Reader with a lower block size limit, to bound memory
    /// usage when the stream is known to use smaller blocks.
    ///
    /// # Panics
    /// Panics if max_block_size is 0 or greater than 64 MiB
    pub fn with_max_block_size(reader: R, max_block_size: usize) -> Self {
        assert!(
            max_block_size > 0 && max_block_size <= MAX_BLOCK_SIZE,
            "max_block_size must be > 0 and <= 64 MiB"
        );

        Reader {
            reader,
            buf: Vec::new(),
            pos: 0,
            eof: false,
            max_block_size,
        }
    }

    /// Read and decompress the next block. Returns false at end of
    /// stream.
    fn read_block(&mut self) -> io::Result<bool> {
        // End of input at a block boundary is the end of the container;
        // there is no trailer to look for.
        let mut header = [0u8; BLOCK_HEADER_SIZE];
        match self.reader.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.eof = true;
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        let block_len = u32::from_le_bytes(header) as usize;

        if block_len > self.max_block_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("crush: block of {} bytes exceeds limit", block_len),
            ));
        }

        self.buf.clear();
        self.buf.resize(block_len, 0);
        self.pos = 0;

        depack_from_stream(&mut self.reader, &mut self.buf)?;

        Ok(true)
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        while self.pos == self.buf.len() {
            if self.eof || !self.read_block()? {
                return Ok(0);
            }
        }

        let n = out.len().min(self.buf.len() - self.pos);
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;

        Ok(n)
    }
}
