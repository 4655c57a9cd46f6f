// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

use std::fmt;

/// Result type for CRUSH operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for CRUSH compression/decompression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The packed data is corrupt
    Corrupt,

    /// The compression level is outside 5..=10
    InvalidLevel(u32),

    /// A destination or scratch buffer is too small
    BufferTooSmall,

    /// The input is too large to compress in one call
    TooLarge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Corrupt => write!(f, "crush: corrupt input"),
            Error::InvalidLevel(level) => {
                write!(f, "crush: invalid compression level {}", level)
            }
            Error::BufferTooSmall => write!(f, "crush: buffer too small"),
            Error::TooLarge => write!(f, "crush: input too large"),
        }
    }
}

impl std::error::Error for Error {}
