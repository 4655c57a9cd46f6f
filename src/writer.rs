// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

//! Stream writer for the CRUSH block container.
//!
//! A compressed file is a plain sequence of blocks, each a 4-byte
//! little-endian uncompressed length followed by the packed bytes. There
//! is no global header, no trailer and no checksum; end of file is the
//! end of the last block.

use std::io::{self, Write};

use crate::constants::*;
use crate::pack::{max_packed_size, pack, workmem_size};

/// Writer compresses data into the CRUSH block container.
///
/// Input is buffered into independent blocks of at most `block_size`
/// bytes (64 MiB by default) and each block is compressed on its own.
/// The packed buffer and parser scratch memory are pooled across blocks.
///
/// # Example
///
/// ```
/// use crushpack::Writer;
/// use std::io::Write;
///
/// let mut compressed = Vec::new();
/// {
///     let mut writer = Writer::new(&mut compressed);
///     writer.write_all(b"Hello, World!").unwrap();
///     writer.flush().unwrap();
/// } // Writer is dropped and finalized here
///
/// assert!(!compressed.is_empty());
/// ```
pub struct Writer<W: Write> {
    writer: W,
    buf: Vec<u8>,
    packed: Vec<u8>,
    workmem: Vec<u32>,
    block_size: usize,
    level: u32,
}

impl<W: Write> Writer<W> {
    /// Create a new Writer at the default level and block size.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, DEFAULT_LEVEL, DEFAULT_BLOCK_SIZE)
    }

    /// Create a new Writer at the given compression level.
    ///
    /// # Panics
    /// Panics if the level is outside 5..=10
    pub fn with_level(writer: W, level: u32) -> Self {
        Self::with_options(writer, level, DEFAULT_BLOCK_SIZE)
    }

    /// Create a new Writer with a specific level and block size.
    ///
    /// # Panics
    /// Panics if the level is outside 5..=10, or if the block size is 0
    /// or greater than 64 MiB
    pub fn with_options(writer: W, level: u32, block_size: usize) -> Self {
        assert!(
            (MIN_LEVEL..=MAX_LEVEL).contains(&level),
            "level must be in 5..=10"
        );
        assert!(
            block_size > 0 && block_size <= MAX_BLOCK_SIZE,
            "block_size must be > 0 and <= 64 MiB"
        );

        Writer {
            writer,
            buf: Vec::new(),
            packed: Vec::new(),
            workmem: Vec::new(),
            block_size,
            level,
        }
    }

    /// Compress and write out the buffered block, if any.
    fn flush_block(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }

        let need_packed = max_packed_size(self.buf.len());
        if self.packed.len() < need_packed {
            self.packed.resize(need_packed, 0);
        }

        // workmem_size only fails on a bad level, which the constructor
        // ruled out.
        let need_workmem = workmem_size(self.buf.len(), self.level).unwrap();
        if self.workmem.len() < need_workmem {
            self.workmem.resize(need_workmem, 0);
        }

        let packed_size = pack(&self.buf, &mut self.packed, &mut self.workmem, self.level)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.writer
            .write_all(&(self.buf.len() as u32).to_le_bytes())?;
        self.writer.write_all(&self.packed[..packed_size])?;

        self.buf.clear();

        Ok(())
    }

    /// Get a reference to the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

impl<W: Write> Write for Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut written = 0;

        while written < buf.len() {
            let space_in_buf = self.block_size - self.buf.len();

            if space_in_buf == 0 {
                self.flush_block()?;
                continue;
            }

            let to_write = (buf.len() - written).min(space_in_buf);
            self.buf
                .extend_from_slice(&buf[written..written + to_write]);
            written += to_write;
        }

        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_block()?;
        self.writer.flush()
    }
}

impl<W: Write> Drop for Writer<W> {
    fn drop(&mut self) {
        // Try to flush on drop, but ignore errors since we can't handle them
        let _ = self.flush();
    }
}
