// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

//! Compression entry points: level dispatch, buffer sizing, and the
//! allocating convenience wrapper.

use crate::btparse;
use crate::constants::*;
use crate::error::{Error, Result};
use crate::leparse;

/// Upper bound on the packed size of `src_size` input bytes.
///
/// Worst case the stream is all 9-bit literals plus final padding, which
/// stays comfortably inside this bound.
pub fn max_packed_size(src_size: usize) -> usize {
    src_size + src_size / 8 + 64
}

/// Number of `u32` scratch words `pack` needs for `src_size` input bytes
/// at the given level.
///
/// Levels 5-7 parse backwards over hash chains and overlap their arrays;
/// levels 8-10 parse forwards over binary trees and cannot.
pub fn workmem_size(src_size: usize, level: u32) -> Result<usize> {
    match level {
        5..=7 => Ok(leparse::workmem_len(src_size)),
        8..=10 => Ok(btparse::workmem_len(src_size)),
        _ => Err(Error::InvalidLevel(level)),
    }
}

// Each level maps to a parser plus a search depth and a match length at
// which the search commits without exploring further candidates.
fn level_params(level: u32) -> Result<(bool, usize, usize)> {
    match level {
        5 => Ok((false, 1, 16)),
        6 => Ok((false, 8, 32)),
        7 => Ok((false, 64, 64)),
        8 => Ok((true, 16, 96)),
        9 => Ok((true, 32, 224)),
        10 => Ok((true, usize::MAX, usize::MAX)),
        _ => Err(Error::InvalidLevel(level)),
    }
}

/// Compress `src` into `dst`, using `workmem` as scratch. Returns the
/// packed size in bytes.
///
/// `dst` must hold at least [`max_packed_size`] bytes and `workmem` at
/// least [`workmem_size`] words for `src.len()` at this level. Empty
/// input packs to zero bytes.
///
/// Compression levels 5 to 9 trade time for ratio; level 10 is optimal
/// but very slow.
pub fn pack(src: &[u8], dst: &mut [u8], workmem: &mut [u32], level: u32) -> Result<usize> {
    let (use_btparse, max_depth, accept_len) = level_params(level)?;

    if src.is_empty() {
        return Ok(0);
    }

    if src.len() > MAX_SRC_SIZE {
        return Err(Error::TooLarge);
    }

    if dst.len() < max_packed_size(src.len()) {
        return Err(Error::BufferTooSmall);
    }

    if workmem.len() < workmem_size(src.len(), level)? {
        return Err(Error::BufferTooSmall);
    }

    let packed_size = if use_btparse {
        btparse::pack(src, dst, workmem, max_depth, accept_len)
    } else {
        leparse::pack(src, dst, workmem, max_depth, accept_len)
    };

    Ok(packed_size)
}

/// Compress `src` at the given level into a freshly allocated `Vec`.
///
/// # Example
///
/// ```
/// let packed = crushpack::compress(b"compress me, maybe", 5).unwrap();
/// let unpacked = crushpack::decompress(&packed, 18).unwrap();
/// assert_eq!(unpacked, b"compress me, maybe");
/// ```
pub fn compress(src: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut dst = vec![0u8; max_packed_size(src.len())];
    let mut workmem = vec![0u32; workmem_size(src.len(), level)?];

    let packed_size = pack(src, &mut dst, &mut workmem, level)?;
    dst.truncate(packed_size);

    Ok(dst)
}
