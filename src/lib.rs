// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

//! # CRUSH compression
//!
//! This library implements the CRUSH compression format by Ilya Muravyov,
//! using match finding and optimal parsing techniques from the BriefLZ
//! family. The output is bit-compatible with the original container: a
//! token stream of 9-bit literals and variable-length match codes, packed
//! LSB first.
//!
//! Compression levels 5-7 run a backwards dynamic programming parse over
//! hash chains; levels 8-10 run a forwards parse over per-hash binary
//! trees. Level 10 is optimal but very slow.
//!
//! ## Block example
//!
//! ```rust
//! use crushpack::{compress, decompress};
//!
//! let data = b"Hello, World! Hello, World! Hello, World!";
//! let packed = compress(data, 5).expect("compression failed");
//! let unpacked = decompress(&packed, data.len()).expect("decompression failed");
//! assert_eq!(data, &unpacked[..]);
//! ```
//!
//! ## Container example
//!
//! A compressed file is a sequence of independent blocks, each prefixed
//! with its 4-byte little-endian uncompressed length:
//!
//! ```rust
//! use crushpack::{Reader, Writer};
//! use std::io::{Read, Write};
//!
//! let mut packed = Vec::new();
//! {
//!     let mut writer = Writer::with_level(&mut packed, 7);
//!     writer.write_all(b"stream me").unwrap();
//!     writer.flush().unwrap();
//! }
//!
//! let mut out = Vec::new();
//! Reader::new(&packed[..]).read_to_end(&mut out).unwrap();
//! assert_eq!(out, b"stream me");
//! ```

mod bitio;
mod btparse;
mod constants;
mod depack;
mod error;
mod leparse;
mod pack;
mod reader;
mod token;
mod util;
mod writer;

pub use constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_LEVEL, MAX_BLOCK_SIZE, MAX_LEVEL, MAX_MATCH, MIN_LEVEL, MIN_MATCH,
};
pub use depack::{decompress, depack, depack_from_stream};
pub use error::{Error, Result};
pub use pack::{compress, max_packed_size, pack, workmem_size};
pub use reader::Reader;
pub use writer::Writer;
