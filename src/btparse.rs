// Copyright 2025 the crushpack authors
// CRUSH format compression with BriefLZ-style parsing
// Use of this source code is governed by the zlib license
// that can be found in the LICENSE file.

//! Forwards dynamic programming parse using binary trees, checking all
//! possible matches. Drives compression levels 8 through 10.
//!
//! The match search keeps a binary tree per hash entry, keyed by the
//! suffix starting at each position. Each search re-roots the tree at the
//! current position, so recent positions sit near the top and matches
//! come out ordered from the closest back. Depth-limited searches prune
//! the subtree they never reached; the trees can grow unbalanced but stay
//! correct. The same search structure appears in LZMA and libdeflate.
//!
//! A forwards parse cannot overlap its arrays the way the backwards one
//! does, so this needs 5n + 3 words plus the lookup table.

use crate::bitio::BitWriter;
use crate::constants::*;
use crate::token::{match_cost, put_literal, put_match};
use crate::util::hash3_bits;

/// Scratch words needed to parse `src_size` bytes.
pub(crate) fn workmem_len(src_size: usize) -> usize {
    5 * src_size + 3 + LOOKUP_SIZE
}

/// Compress `src` into `dst` with the binary-tree parser. Returns the
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

    let (cost, rest) = wm.split_at_mut(n + 1);
    let (mpos, rest) = rest.split_at_mut(n + 1);
    let (mlen, rest) = rest.split_at_mut(n + 1);
    let (nodes, rest) = rest.split_at_mut(2 * n);
    let lookup = &mut rest[..LOOKUP_SIZE];

    lookup.fill(NO_MATCH_POS);

    // All positions start as unreachable literals.
    cost.fill(u32::MAX);
    mlen.fill(1);
    cost[0] = 0;

    // Next position where matches are scored. While a found match of
    // accept_len or longer is being skipped over, the trees still have to
    // be updated at every position, but scoring is suppressed.
    let mut next_match_cur = 0;

    // Phase 1: lowest-cost path arriving at each position.
    for cur in 0..=last_match_pos {
        if cost[cur + 1] > cost[cur] + LITERAL_COST {
            cost[cur + 1] = cost[cur] + LITERAL_COST;
            mlen[cur + 1] = 1;
        }

        if cur > next_match_cur {
            next_match_cur = cur;
        }

        let mut max_len = MIN_MATCH - 1;

        // The current root of the tree of suffixes with this hash; cur
        // becomes the new root.
        let hash = hash3_bits(&src[cur..], HASH_BITS);
        let mut next = lookup[hash];
        lookup[hash] = cur as u32;

        let mut lt_node = 2 * cur;
        let mut gt_node = 2 * cur + 1;
        let mut lt_len = 0;
        let mut gt_len = 0;

        debug_assert!(next == NO_MATCH_POS || (next as usize) < cur);

        // While scoring, lengths up to MAX_MATCH matter; while skipping,
        // comparing past accept_len cannot change the tree descent.
        let len_left = if n - cur > MAX_MATCH { MAX_MATCH } else { n - cur };
        let len_limit = if cur == next_match_cur {
            len_left
        } else if accept_len < len_left {
            accept_len
        } else {
            len_left
        };
        let mut num_chain = max_depth;

        loop {
            // At the bottom of the tree, mark the leaf slots. When the
            // depth limit struck first this also prunes the subtree that
            // was never searched and cannot be placed.
            if next == NO_MATCH_POS || cur - next as usize > W_SIZE || num_chain == 0 {
                nodes[lt_node] = NO_MATCH_POS;
                nodes[gt_node] = NO_MATCH_POS;

                break;
            }

            num_chain -= 1;

            let pos = next as usize;

            // The suffix at pos compared equal for the first lt_len
            // positions against one bound and gt_len against the other,
            // so it matches cur up to at least the smaller of the two.
            let mut len = lt_len.min(gt_len);

            while len < len_limit && src[pos + len] == src[cur + len] {
                len += 1;
            }

            // Matches arrive closest first, so lengths at or below
            // max_len cannot encode shorter from here; only the
            // extension lengths need scoring.
            if cur == next_match_cur && len > max_len {
                for i in max_len + 1..=len {
                    let cost_there = cost[cur] + match_cost(cur - pos, i);

                    if cost_there < cost[cur + i] {
                        cost[cur + i] = cost_there;
                        mpos[cur + i] = (cur - pos - 1) as u32;
                        mlen[cur + i] = i as u32;
                    }
                }

                max_len = len;

                if len >= accept_len {
                    next_match_cur = cur + len;
                }
            }

            // A full-length compare means the suffix at pos equals cur up
            // to the horizon, so cur adopts both subtrees. pos drops out
            // of the tree; cur is equal and closer for future searches.
            if len >= accept_len || len == len_limit {
                nodes[lt_node] = nodes[2 * pos];
                nodes[gt_node] = nodes[2 * pos + 1];

                break;
            }

            // Re-root: hang pos off the matching side and continue the
            // search in its far subtree. Everything under pos's left
            // subtree is less than pos, hence less than cur, so the open
            // lt slot moves to pos's right subtree (and symmetrically on
            // the greater side).
            if src[pos + len] < src[cur + len] {
                nodes[lt_node] = next;
                lt_node = 2 * pos + 1;
                next = nodes[lt_node];
                lt_len = len;
            } else {
                nodes[gt_node] = next;
                gt_node = 2 * pos;
                next = nodes[gt_node];
                gt_len = len;
            }

            debug_assert!(next == NO_MATCH_POS || (next as usize) < pos);
        }
    }

    // Trailing positions where no match can begin.
    for cur in last_match_pos + 1..n {
        if cost[cur + 1] > cost[cur] + LITERAL_COST {
            cost[cur + 1] = cost[cur] + LITERAL_COST;
            mlen[cur + 1] = 1;
        }
    }

    // Phase 2: walk the lowest-cost path backwards, packing the tokens
    // into a dense tail of mlen/mpos.
    let mut next_token = n;
    let mut cur = n;

    while cur > 0 {
        mlen[next_token] = mlen[cur];
        mpos[next_token] = mpos[cur];

        cur -= mlen[next_token] as usize;
        next_token -= 1;
    }

    // Phase 3: stream the tokens in source order.
    let mut src_pos = 0;

    for i in next_token + 1..=n {
        let len = mlen[i] as usize;

        if len == 1 {
            put_literal(&mut lbw, src[src_pos]);
        } else {
            put_match(&mut lbw, len, mpos[i] as usize + 1);
        }

        src_pos += len;
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
        assert_eq!(roundtrip(b"", 16, 96), 0);
        assert_eq!(roundtrip(b"x", 16, 96), 2);
        assert_eq!(roundtrip(b"xy", 16, 96), 3);
        assert_eq!(roundtrip(b"xyz", 16, 96), 4);
    }

    #[test]
    fn test_zero_run_parses_to_two_matches() {
        // One literal, then the optimal parse covers 1023 bytes in two
        // overlapping distance-1 matches.
        let data = vec![0u8; 1024];
        let packed_size = roundtrip(&data, 32, 224);
        assert!(packed_size < 40);
    }

    #[test]
    fn test_unbounded_depth() {
        let mut data = Vec::new();
        for i in 0..3000u32 {
            data.push((i % 7) as u8 * 31);
            data.push((i % 13) as u8);
        }
        roundtrip(&data, usize::MAX, usize::MAX);
    }

    #[test]
    fn test_periodic_data_rebuilds_trees() {
        // Period-3 data funnels every position into a handful of hash
        // buckets, forcing deep re-rooting.
        let data: Vec<u8> = b"abc".iter().cycle().take(5000).copied().collect();

        for (max_depth, accept_len) in [(16, 96), (32, 224), (usize::MAX, usize::MAX)] {
            roundtrip(&data, max_depth, accept_len);
        }
    }

    #[test]
    fn test_depth_pruning_stays_correct() {
        // Tiny depth limit prunes aggressively; output must still decode.
        let data: Vec<u8> = (0..20_000u32)
            .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
            .collect();
        roundtrip(&data, 2, 8);
    }

    #[test]
    fn test_matches_beyond_accept_len_commit_early() {
        let mut data = vec![0x11u8; 500];
        data.extend_from_slice(b"divider");
        data.extend(vec![0x11u8; 500]);
        roundtrip(&data, 16, 96);
    }
}
