use anyhow::{Context, Result};
use nastape_core::{
    completeness::{find_sequence_gaps, SequenceGap},
    scanner::scan_stream_with_stats,
    Completeness, ErrorClass,
};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

use super::read_input;

#[derive(Serialize, Deserialize)]
struct RecoveredBlock {
    offset: usize,
    block_no: u8,
    load_address: u16,
    data_size: usize,
    raw_size: usize,
    data_checksum: u8,
    first_block: bool,
    data: String,
}

#[derive(Serialize, Deserialize)]
struct ScanOutput {
    bytes_scanned: usize,
    bytes_recovered: usize,
    pilot_found: bool,
    stop_reason: String,
    stop_class: ErrorClass,
    completeness: Completeness,
    gaps: Vec<SequenceGap>,
    blocks: Vec<RecoveredBlock>,
}

pub fn execute(input: &str, output: Option<&str>, stats_only: bool) -> Result<()> {
    info!("Scanning file: {}", input);

    let data = read_input(input)?;

    info!("File size: {} bytes", data.len());

    let (report, stats) = scan_stream_with_stats(&data);

    // Print statistics
    println!("\n=== Scan Results ===");
    println!("Bytes scanned:     {} bytes", stats.bytes_scanned);
    println!("Pilot tone:        {}", if stats.pilot_found { "found" } else { "missing" });
    println!("Valid blocks:      {}", stats.blocks_found);
    println!("Bytes recovered:   {} bytes", stats.bytes_recovered);
    println!("Recovery rate:     {:.2}%", stats.recovery_rate());
    println!("Stopped because:   {}", report.stop);
    println!();

    if stats_only {
        return Ok(());
    }

    let recovered: Vec<RecoveredBlock> = report
        .blocks
        .iter()
        .map(|lb| RecoveredBlock {
            offset: lb.offset,
            block_no: lb.block.block_no(),
            load_address: lb.block.load_address(),
            data_size: lb.block.data_size(),
            raw_size: lb.size,
            data_checksum: lb.block.data_checksum(),
            first_block: lb.block.is_first_block(),
            data: hex::encode(lb.block.data()),
        })
        .collect();

    if let Some(output_path) = output {
        let scan_output = ScanOutput {
            bytes_scanned: stats.bytes_scanned,
            bytes_recovered: stats.bytes_recovered,
            pilot_found: stats.pilot_found,
            stop_reason: report.stop.to_string(),
            stop_class: stats.stop_class,
            completeness: report.completeness(),
            gaps: find_sequence_gaps(report.tape_blocks()),
            blocks: recovered,
        };

        let json = serde_json::to_string_pretty(&scan_output)
            .with_context(|| "Failed to serialize recovered blocks")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Recovered blocks written to: {}", output_path);
    } else {
        println!("=== Recovered Blocks ===");
        for block in &recovered {
            println!(
                "Block {:3} @ offset {}: {:04x}, {} data bytes",
                block.block_no, block.offset, block.load_address, block.data_size
            );
        }
    }

    Ok(())
}
