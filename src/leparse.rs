// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

//! Backwards dynamic programming parse over hash chains, with
//! left-extension of matches. Drives compression levels 5 through 7.

use crate::bitio::BitWriter;
use crate::constants::*;
use crate::token::{match_cost, put_literal, put_match};
use crate::util::{hash3_bits, ulog2};

/// Scratch words needed to parse `src_size` bytes.
pub(crate) fn workmem_len(src_size: usize) -> usize {
    if LOOKUP_SIZE < 2 * src_size {
        3 * src_size
    } else {
        src_size + LOOKUP_SIZE
    }
}

// The scratch buffer is laid out so everything fits in workmem_len words.
//
// The lookup table is only needed in the first phase to thread the hash
// chains, so it overlaps mpos and, for small inputs, mlen. The second
// phase consumes prev from right to left, which is also the order cost is
// filled in, so cost overlaps prev. cost uses src_size + 1 entries; the
// extra entry lands on mpos[0], which is not needed until after the parse.
//
//   prev  = wm[0 .. n]        cost = wm[0 ..= n]
//   mpos  = wm[n .. 2n]       lookup = wm[n .. n + (1 << bits)]
//   mlen  = wm[2n .. 3n]
//
/// Compress `src` into `dst` with the hash-chain parser. Returns the
/// packed size in bytes.
pub(crate) fn pack(
    src: &[u8],
    dst: &mut [u8],
    wm: &mut [u32],
    max_depth: usize,
    accept_len: usize,
) -> usize {
    let n = src.len();
    let mut lbw = BitWriter::new(dst);

    if n == 0 {
        return 0;
    }

    if n < 4 {
        for &byte in src {
            put_literal(&mut lbw, byte);
        }
        return lbw.finalize();
    }

    let last_match_pos = n - 3;

    let mpos = n;
    let mlen = 2 * n;
    let lookup = n;

    // Phase 1: thread the hash chains through prev.
    //
    // Small inputs use the full hash width; once the chains no longer fit
    // next to the table, the width shrinks to log2(n) so the aliased
    // lookup stays inside the mpos/mlen region.
    let bits = if 2 * n < LOOKUP_SIZE {
        HASH_BITS
    } else {
        ulog2(n)
    };

    for slot in wm[lookup..lookup + (1 << bits)].iter_mut() {
        *slot = NO_MATCH_POS;
    }

    for i in 0..=last_match_pos {
        let hash = hash3_bits(&src[i..], bits);
        wm[i] = wm[lookup + hash];
        wm[lookup + hash] = i as u32;
    }

    // The final two positions can never start a match.
    wm[mlen + n - 2] = 1;
    wm[mlen + n - 1] = 1;

    wm[n - 2] = 2 * LITERAL_COST;
    wm[n - 1] = LITERAL_COST;
    wm[n] = 0;

    // Phase 2: lowest-cost path from each position to the end.
    let mut cur = last_match_pos;

    while cur > 0 {
        // prev[cur] must be read before the literal baseline lands in the
        // aliased cost[cur].
        let mut next = wm[cur];

        debug_assert!(next == NO_MATCH_POS || (next as usize) < cur);

        wm[cur] = wm[cur + 1] + LITERAL_COST;
        wm[mlen + cur] = 1;

        let mut max_len = MIN_MATCH - 1;

        let len_limit = if n - cur > MAX_MATCH { MAX_MATCH } else { n - cur };
        let mut num_chain = max_depth;

        // Walk the chain of earlier positions with this hash, closest
        // first.
        while next != NO_MATCH_POS && num_chain > 0 {
            num_chain -= 1;

            let pos = next as usize;

            if cur - pos > W_SIZE {
                break;
            }

            let mut len = 0;

            // Check the byte past the current best first; only a strictly
            // longer match can be worth encoding from farther away.
            if max_len < len_limit && src[pos + max_len] == src[cur + max_len] {
                while len < len_limit && src[pos + len] == src[cur + len] {
                    len += 1;
                }
            }

            // Since the chain runs from the closest match back, the
            // encoding of every length up to max_len can only get longer
            // at this pos; only the extension lengths need scoring.
            if len > max_len {
                let mut min_cost = u32::MAX;
                let mut min_cost_len = MIN_MATCH - 1;

                for i in max_len + 1..=len {
                    let cost_here = match_cost(cur - pos, i) + wm[cur + i];

                    if cost_here < min_cost {
                        min_cost = cost_here;
                        min_cost_len = i;
                    }
                }

                max_len = len;

                if min_cost < wm[cur] {
                    wm[cur] = min_cost;
                    wm[mpos + cur] = pos as u32;
                    wm[mlen + cur] = min_cost_len as u32;

                    // Left-extend the match while the preceding bytes
                    // agree, re-anchoring the optimum one position
                    // earlier each step.
                    if pos > 0 && src[pos - 1] == src[cur - 1] && min_cost_len < MAX_MATCH {
                        let mut pos = pos;
                        let mut len = min_cost_len;

                        loop {
                            cur -= 1;
                            pos -= 1;
                            len += 1;

                            wm[cur] = match_cost(cur - pos, len) + wm[cur + len];
                            wm[mpos + cur] = pos as u32;
                            wm[mlen + cur] = len as u32;

                            if !(pos > 0 && src[pos - 1] == src[cur - 1] && len < MAX_MATCH) {
                                break;
                            }
                        }

                        break;
                    }
                }
            }

            if len >= accept_len || len == len_limit {
                break;
            }

            next = wm[pos];
        }

        cur -= 1;
    }

    wm[mpos] = 0;
    wm[mlen] = 1;

    // Phase 3: replay the lowest-cost path through the codec.
    let mut i = 0;

    while i < n {
        let len = wm[mlen + i] as usize;

        if len == 1 {
            put_literal(&mut lbw, src[i]);
        } else {
            put_match(&mut lbw, len, i - wm[mpos + i] as usize);
        }

        i += len;
    }

    lbw.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depack::depack;
    use crate::pack::max_packed_size;

    fn roundtrip(src: &[u8], max_depth: usize, accept_len: usize) -> usize {
        let mut packed = vec![0u8; max_packed_size(src.len())];
        let mut wm = vec![0u32; workmem_len(src.len())];

        let packed_size = pack(src, &mut packed, &mut wm, max_depth, accept_len);
        assert!(packed_size <= packed.len());

        let mut out = vec![0u8; src.len()];
        depack(&packed[..packed_size], &mut out).unwrap();
        assert_eq!(out, src);

        packed_size
    }

    #[test]
    fn test_tiny_inputs_are_literals() {
        assert_eq!(roundtrip(b"", 1, 16), 0);
        assert_eq!(roundtrip(b"a", 1, 16), 2);
        assert_eq!(roundtrip(b"\xab\xab", 1, 16), 3);
        assert_eq!(roundtrip(b"abc", 1, 16), 4);
    }

    #[test]
    fn test_four_byte_run() {
        roundtrip(&[0x55; 4], 1, 16);
    }

    #[test]
    fn test_repeats_compress() {
        let data = vec![0u8; 4096];
        let packed_size = roundtrip(&data, 1, 16);
        assert!(packed_size < 64);
    }

    #[test]
    fn test_left_extension_pattern() {
        // A repeated phrase whose second occurrence is first found by the
        // chain at an interior position, exercising the left-extension
        // path.
        let mut data = Vec::new();
        data.extend_from_slice(b"the quick brown fox jumps over the lazy dog. ");
        data.extend_from_slice(b"xyzzy ");
        data.extend_from_slice(b"the quick brown fox jumps over the lazy dog. ");
        roundtrip(&data, 8, 32);
        roundtrip(&data, 64, 64);
    }

    #[test]
    fn test_depth_settings_agree_on_content() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i * 31 % 251) as u8).collect();

        for (max_depth, accept_len) in [(1, 16), (8, 32), (64, 64)] {
            roundtrip(&data, max_depth, accept_len);
        }
    }

    #[test]
    fn test_long_runs_hit_max_match() {
        let data = vec![0x5au8; MAX_MATCH * 3 + 7];
        roundtrip(&data, 64, 64);
    }
}
