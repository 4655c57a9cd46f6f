#![no_main]

use crushpack::Reader;
use libfuzzer_sys::fuzz_target;
use std::io::Read;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes fed through the container reader must never panic
    // and never produce unbounded output.
    let mut reader = Reader::with_max_block_size(data, 1 << 20);
    let mut out = Vec::new();
    let _ = reader.take(4 << 20).read_to_end(&mut out);
});
