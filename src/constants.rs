// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

/// Window bits; offsets reach back at most `W_SIZE` bytes.
pub const W_BITS: u32 = 21;

/// Window size (2 MiB).
pub const W_SIZE: usize = 1 << W_BITS;

/// Bits used for the offset slot.
pub const SLOT_BITS: u32 = 4;

/// Number of offset slots.
pub const NUM_SLOTS: u32 = 1 << SLOT_BITS;

// Match length buckets. The selector is unary-terminated except for the
// last bucket, which reuses the all-zeros prefix:
//
//   1     xx          [0, A)
//   01    xx          [A, B)
//   001   xx          [B, C)
//   0001  xxx         [C, D)
//   00001 xxxxx       [D, E)
//   00000 xxxxxxxxx   [E, F)
pub const A_BITS: u32 = 2;
pub const B_BITS: u32 = 2;
pub const C_BITS: u32 = 2;
pub const D_BITS: u32 = 3;
pub const E_BITS: u32 = 5;
pub const F_BITS: u32 = 9;

pub const A: usize = 1 << A_BITS;
pub const B: usize = (1 << B_BITS) + A;
pub const C: usize = (1 << C_BITS) + B;
pub const D: usize = (1 << D_BITS) + C;
pub const E: usize = (1 << E_BITS) + D;
pub const F: usize = (1 << F_BITS) + E;

/// Shortest match a token can encode.
pub const MIN_MATCH: usize = 3;

/// Longest match a token can encode.
pub const MAX_MATCH: usize = (F - 1) + MIN_MATCH;

/// A literal always costs a tag bit plus eight data bits.
pub const LITERAL_COST: u32 = 9;

// Number of bits of hash used for the match-finder lookup table.
//
// Values between 10 and 18 work; 17 (128Ki entries) balances table init
// cost against chain quality.
pub const HASH_BITS: u32 = 17;

/// Entries in the hash lookup table.
pub const LOOKUP_SIZE: usize = 1 << HASH_BITS;

/// Sentinel for "no earlier position" in chains, trees and lookup slots.
pub const NO_MATCH_POS: u32 = u32::MAX;

/// Lowest supported compression level.
pub const MIN_LEVEL: u32 = 5;

/// Highest supported compression level (optimal parse).
pub const MAX_LEVEL: u32 = 10;

/// Default compression level.
pub const DEFAULT_LEVEL: u32 = 5;

/// Largest input a single `pack` call accepts. Parse state is kept in
/// 32-bit words, and bit costs (9 bits per literal) must stay below
/// `u32::MAX`.
pub const MAX_SRC_SIZE: usize = 1 << 28;

/// Maximum uncompressed size of one container block (64 MiB).
pub const MAX_BLOCK_SIZE: usize = 64 << 20;

/// Default container block size.
pub const DEFAULT_BLOCK_SIZE: usize = MAX_BLOCK_SIZE;

/// Size of the per-block uncompressed-length header.
pub const BLOCK_HEADER_SIZE: usize = 4;
