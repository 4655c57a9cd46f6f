#![no_main]

use crushpack::{compress, decompress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Skip very large inputs to avoid OOM
    if data.len() > 1_000_000 {
        return;
    }

    // Every level must round-trip every input exactly. Level 10 is
    // restricted to smaller inputs since it explores every match.
    for level in 5u32..=9 {
        let packed = compress(data, level).expect("pack failed");
        let unpacked = decompress(&packed, data.len()).expect("depack failed");
        assert_eq!(data, &unpacked[..], "level {} roundtrip failed", level);
    }

    if data.len() <= 64 * 1024 {
        let packed = compress(data, 10).expect("pack failed");
        let unpacked = decompress(&packed, data.len()).expect("depack failed");
        assert_eq!(data, &unpacked[..], "optimal roundtrip failed");
    }
});
