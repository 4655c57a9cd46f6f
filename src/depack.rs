// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

//! Decompression. The packed stream is self-delimiting only through the
//! decoded size: the decoder stops once `dst` is full, and the bit reader
//! never consumes a byte the stream does not need.

use std::io::{self, Read};

use crate::bitio::BitReader;
use crate::error::{Error, Result};
use crate::token::{get_token, Token};

fn corrupt(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("crush: {}", msg))
}

/// Decompress `src` into `dst`, which must be exactly the decompressed
/// size. Returns the number of bytes produced.
pub fn depack(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    depack_from_stream(&mut &src[..], dst).map_err(|_| Error::Corrupt)
}

/// Decompress into a freshly allocated `Vec` of `depacked_size` bytes.
pub fn decompress(src: &[u8], depacked_size: usize) -> Result<Vec<u8>> {
    let mut dst = vec![0u8; depacked_size];
    depack(src, &mut dst)?;

    Ok(dst)
}

/// Decompress `dst.len()` bytes from a byte stream into `dst`.
///
/// The CRUSH format carries no packed-size field, so bytes are read
/// lazily one at a time; when this returns, `src` is positioned exactly
/// past the final byte of the packed data.
pub fn depack_from_stream<R: Read>(src: &mut R, dst: &mut [u8]) -> io::Result<usize> {
    let mut lbr = BitReader::new(src);
    let mut dst_size = 0;

    while dst_size < dst.len() {
        match get_token(&mut lbr)? {
            Token::Literal(byte) => {
                dst[dst_size] = byte;
                dst_size += 1;
            }
            Token::Match { len, dist } => {
                if dist > dst_size {
                    return Err(corrupt("match offset out of range"));
                }

                if len > dst.len() - dst_size {
                    return Err(corrupt("match runs past end of output"));
                }

                // Copy forwards one byte at a time; with dist < len the
                // overlap replicates the trailing pattern.
                let mut from = dst_size - dist;

                for _ in 0..len {
                    dst[dst_size] = dst[from];
                    dst_size += 1;
                    from += 1;
                }
            }
        }
    }

    Ok(dst_size)
}
