#![no_main]

use crushpack::depack;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // The first byte picks a declared output size; the rest is treated
    // as a packed stream. Decoding must error or succeed, never panic.
    let declared = (data[0] as usize) * 37;
    let mut out = vec![0u8; declared];
    let _ = depack(&data[1..], &mut out);
});
