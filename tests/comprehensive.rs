// Copyright 2025 the crushpack authors
// Comprehensive tests for CRUSH compression

use crushpack::{
    compress, decompress, depack, depack_from_stream, max_packed_size, pack, workmem_size, Error,
    Reader, Writer, MAX_LEVEL, MIN_LEVEL,
};
use std::io::{Cursor, Read, Write as _};

fn fixtures() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", Vec::new()),
        ("single_byte", vec![b'x']),
        ("two_bytes", vec![0xab, 0xab]),
        ("three_bytes", b"abc".to_vec()),
        ("small_text", b"Hello, World!".to_vec()),
        ("repeated", vec![b'a'; 1000]),
        ("pattern", (0..1000).map(|i| (i % 256) as u8).collect()),
        (
            "lorem",
            b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(100),
        ),
        (
            "pseudo_random",
            (0..50_000u64)
                .scan(42u64, |s, _| {
                    *s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
                    Some((*s >> 32) as u8)
                })
                .collect(),
        ),
        (
            "runs_and_text",
            {
                let mut v = vec![0u8; 5000];
                v.extend_from_slice(&b"interleaved text content ".repeat(200));
                v.extend(vec![0xffu8; 5000]);
                v
            },
        ),
    ]
}

#[test]
fn test_round_trip_all_levels() {
    for (name, data) in fixtures() {
        for level in MIN_LEVEL..=MAX_LEVEL {
            let packed = compress(&data, level)
                .unwrap_or_else(|e| panic!("{}: level {} pack failed: {}", name, level, e));

            assert!(
                packed.len() <= max_packed_size(data.len()),
                "{}: level {} exceeds packed size bound",
                name,
                level
            );

            let unpacked = decompress(&packed, data.len())
                .unwrap_or_else(|e| panic!("{}: level {} depack failed: {}", name, level, e));

            assert_eq!(unpacked, data, "{}: level {} round-trip failed", name, level);
        }
    }
}

#[test]
fn test_deeper_searches_never_lose_within_family() {
    for (name, data) in fixtures() {
        let le5 = compress(&data, 5).unwrap().len();
        let le6 = compress(&data, 6).unwrap().len();
        let le7 = compress(&data, 7).unwrap().len();

        assert!(le6 <= le5, "{}: level 6 beat by level 5", name);
        assert!(le7 <= le5, "{}: level 7 beat by level 5", name);
    }
}

#[test]
fn test_optimal_parse_wins_on_compressible_fixtures() {
    for (name, data) in fixtures() {
        if data.len() < 1000 {
            continue;
        }

        let sizes: Vec<usize> = (MIN_LEVEL..=MAX_LEVEL)
            .map(|level| compress(&data, level).unwrap().len())
            .collect();

        let optimal = sizes[5];
        assert_eq!(
            optimal,
            *sizes.iter().min().unwrap(),
            "{}: level 10 is not the smallest of {:?}",
            name,
            sizes
        );
    }
}

#[test]
fn test_pack_into_caller_buffers() {
    let data = b"caller-owned buffers all the way down ".repeat(50);

    for level in MIN_LEVEL..=MAX_LEVEL {
        let mut dst = vec![0u8; max_packed_size(data.len())];
        let mut workmem = vec![0u32; workmem_size(data.len(), level).unwrap()];

        let packed_size = pack(&data, &mut dst, &mut workmem, level).unwrap();

        let mut out = vec![0u8; data.len()];
        assert_eq!(depack(&dst[..packed_size], &mut out), Ok(data.len()));
        assert_eq!(out, data);
    }
}

#[test]
fn test_workmem_reuse_across_calls() {
    // A pooled scratch buffer sized for the largest call serves smaller
    // ones; every call must fully overwrite what it reads.
    let big = vec![b'z'; 10_000];
    let small = b"tiny".to_vec();

    let mut workmem = vec![0u32; workmem_size(big.len(), 9).unwrap()];
    let mut dst = vec![0u8; max_packed_size(big.len())];

    for data in [&big, &small, &big, &small] {
        let packed_size = pack(data, &mut dst, &mut workmem, 9).unwrap();
        let mut out = vec![0u8; data.len()];
        depack(&dst[..packed_size], &mut out).unwrap();
        assert_eq!(&out, data);
    }
}

#[test]
fn test_container_round_trip() {
    for (name, data) in fixtures() {
        let mut compressed = Vec::new();
        {
            let mut writer = Writer::with_options(&mut compressed, 6, 4096);
            writer.write_all(&data).unwrap();
            writer.flush().unwrap();
        }

        let mut reader = Reader::new(&compressed[..]);
        let mut decompressed = Vec::new();
        reader.read_to_end(&mut decompressed).unwrap();

        assert_eq!(decompressed, data, "{}: container round-trip failed", name);
    }
}

#[test]
fn test_container_blocks_are_independent() {
    // Each block can be decoded on its own given its header.
    let data = b"independent blocks! ".repeat(400);
    let block_size = 1000;

    let mut compressed = Vec::new();
    {
        let mut writer = Writer::with_options(&mut compressed, 5, block_size);
        writer.write_all(&data).unwrap();
        writer.flush().unwrap();
    }

    let mut pos = 0;
    let mut offset = 0;
    while pos < compressed.len() {
        let n = u32::from_le_bytes(compressed[pos..pos + 4].try_into().unwrap()) as usize;
        pos += 4;

        let mut cursor = Cursor::new(&compressed[pos..]);
        let mut block = vec![0u8; n];
        depack_from_stream(&mut cursor, &mut block).unwrap();

        assert_eq!(&block[..], &data[offset..offset + n]);
        pos += cursor.position() as usize;
        offset += n;
    }
    assert_eq!(offset, data.len());
}

#[test]
fn test_corrupt_streams_error() {
    let data = b"some perfectly fine data to mangle".repeat(10);
    let packed = compress(&data, 5).unwrap();

    // Flipping bits must never panic; it either still decodes to the
    // declared length or reports corruption.
    for i in 0..packed.len().min(200) {
        let mut mangled = packed.clone();
        mangled[i] ^= 0x10;

        let mut out = vec![0u8; data.len()];
        let _ = depack(&mangled, &mut out);
    }

    // Declaring a larger output than the stream encodes is corruption.
    let mut out = vec![0u8; data.len() + 100];
    assert_eq!(depack(&packed, &mut out), Err(Error::Corrupt));
}

#[test]
fn test_decoder_rejects_arbitrary_garbage() {
    let mut state = 0xdeadbeefu64;
    for _ in 0..200 {
        let len = (state % 64) as usize;
        let mut garbage = vec![0u8; len];
        for byte in garbage.iter_mut() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            *byte = (state >> 32) as u8;
        }

        let mut out = vec![0u8; 256];
        let _ = depack(&garbage, &mut out);
    }
}
