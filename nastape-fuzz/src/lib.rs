//! Fuzzing entry points for nastape-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_decoder

pub fn fuzz_decode(data: &[u8]) {
    use nastape_core::decoder::decode_block_from_bytes;

    // Try to decode - should never panic
    let _ = decode_block_from_bytes(data);
}

pub fn fuzz_scan(data: &[u8]) {
    use nastape_core::scanner::read_blocks;

    // Scan and assess - should never panic
    let report = read_blocks(data);
    let _ = report.completeness();
}

pub fn fuzz_splice(data: &[u8]) {
    use nastape_core::{encoder::encode_capture, scanner::read_blocks};

    // Re-assembled output must scan back to the same blocks
    let blocks = read_blocks(data).into_blocks();
    let with_pilot = blocks.first().is_some_and(|b| b.is_first_block());
    let out = encode_capture(&blocks, with_pilot);
    let again = read_blocks(&out).into_blocks();
    assert_eq!(blocks.len(), again.len());
}
