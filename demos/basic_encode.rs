//! Basic example of encoding a program as a NASCOM tape image

use bytes::Bytes;
use nastape_core::{
    decoder::decode_block_from_bytes,
    encoder::{encode_tape, BlockBuilder},
    scanner::read_blocks,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Nastape Basic Encoding Example\n");

    // A single block by hand
    let block = BlockBuilder::new(0)
        .load_address(0x0C80)
        .data(Bytes::from_static(b"HELLO"))
        .build()?;

    println!("Encoded block: {} bytes", block.len());
    println!("Header: {:02x?}", &block[..10]);

    let (decoded, consumed) = decode_block_from_bytes(&block)?;
    println!(
        "Decoded block {}: address {:04x}, {} data bytes, checksum {:02x} ({} bytes consumed)\n",
        decoded.block_no(),
        decoded.load_address(),
        decoded.data_size(),
        decoded.data_checksum(),
        consumed
    );

    // A whole program, pilot tone included
    let program: Vec<u8> = (0..1000u32).map(|i| (i % 64) as u8 + 0x20).collect();
    let tape = encode_tape(0x1000, &program)?;
    println!("Encoded {} byte program into {} byte tape image", program.len(), tape.len());

    let report = read_blocks(&tape);
    for located in &report.blocks {
        println!(
            "  block {:3} @ offset {:5}: address {:04x}, {} bytes",
            located.block.block_no(),
            located.offset,
            located.block.load_address(),
            located.block.data_size()
        );
    }

    println!("\nComplete: {}", report.completeness().is_complete());

    Ok(())
}
