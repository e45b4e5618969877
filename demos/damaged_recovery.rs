//! Example demonstrating recovery from two damaged captures of the same tape

use nastape_core::{
    completeness::assess,
    encoder::{encode_capture, encode_tape},
    scanner::{read_blocks, scan_stream_with_stats},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Nastape Damaged Capture Recovery Example\n");

    // Step 1: Create a clean tape with 8 blocks
    println!("Step 1: Encoding a 2 KB program...");
    let program: Vec<u8> = (0..2048u32).map(|i| (i * 7 % 255) as u8 + 1).collect();
    let tape = encode_tape(0x1000, &program)?;
    println!("Created clean tape: {} bytes\n", tape.len());

    // Step 2: Simulate two bad playbacks
    println!("Step 2: Simulating damage...");

    // First playback has a dropout halfway through
    let mut first = tape.to_vec();
    let dropout = first.len() / 2;
    first[dropout..dropout + 40].fill(0xFF);
    println!("First capture: dropout at bytes {}-{}", dropout, dropout + 40);

    // Second playback started late and missed the pilot and first blocks
    let second = tape[tape.len() / 3..].to_vec();
    println!("Second capture: starts at byte {}\n", tape.len() / 3);

    // Step 3: Scan both captures
    println!("Step 3: Scanning captures...");
    let (first_report, stats) = scan_stream_with_stats(&first);
    println!("First capture:");
    println!("  Valid blocks:      {}", stats.blocks_found);
    println!("  Stopped because:   {}", first_report.stop);
    println!("  Recovery rate:     {:.1}%", stats.recovery_rate());

    let (second_report, stats) = scan_stream_with_stats(&second);
    println!("Second capture:");
    println!("  Valid blocks:      {}", stats.blocks_found);
    println!("  Pilot found:       {}", stats.pilot_found);
    println!("  Recovery rate:     {:.1}%\n", stats.recovery_rate());

    // Step 4: Keep the first capture, then append what the second adds
    println!("Step 4: Splicing...");
    let first_blocks = first_report.into_blocks();
    let last_kept = first_blocks.last().map(|b| b.block_no());
    let tail: Vec<_> = second_report
        .into_blocks()
        .into_iter()
        .filter(|b| last_kept.map_or(true, |n| b.block_no() < n))
        .collect();

    let mut merged = encode_capture(&first_blocks, true).to_vec();
    merged.extend_from_slice(&encode_capture(&tail, false));

    let merged_blocks = read_blocks(&merged).into_blocks();
    let completeness = assess(&merged_blocks);
    println!("Merged image: {} blocks, complete: {}", merged_blocks.len(), completeness.is_complete());

    let recovered: Vec<u8> = merged_blocks.iter().flat_map(|b| b.data().to_vec()).collect();
    if recovered == program {
        println!("\n✓ Recovered the program byte for byte");
    } else {
        println!("\n✗ Recovered data differs from the original");
    }

    Ok(())
}
