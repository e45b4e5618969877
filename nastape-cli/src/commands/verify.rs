use anyhow::{Context, Result};
use bytes::Bytes;
use colored::*;
use nastape_core::{
    checksum::checksum,
    completeness::{find_address_breaks, find_sequence_gaps},
    encoder::encode_capture,
    scanner::{find_pilot, read_blocks},
    Completeness, OutputMode, TapeBlock,
};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::read_input;
use crate::cleaned_file_name;

/// What a verify run found and did
#[derive(Debug)]
pub struct VerifyOutcome {
    /// Blocks recovered from the capture
    pub blocks: Vec<TapeBlock>,

    /// Completeness of those blocks
    pub completeness: Completeness,

    /// Output file and how it was written, if anything was written
    pub written: Option<(PathBuf, OutputMode)>,
}

pub fn execute(input: &str, output: Option<&str>) -> Result<VerifyOutcome> {
    info!("Verifying capture: {}", input);

    let data = read_input(input)?;

    info!("File size: {} bytes", data.len());

    if find_pilot(&data).is_none() {
        println!("{} Missing pilot tone", "!".yellow());
    }

    let report = read_blocks(&data);
    if !report.stop.is_end_of_stream() {
        warn!("{}", report.stop);
    }

    println!("\n=== Recovered Blocks ===");
    println!("Got {} valid blocks:", report.blocks.len());
    for located in &report.blocks {
        print_block(&located.block);
    }

    let completeness = report.completeness();
    let blocks = report.into_blocks();

    let explicit_target = output.is_some();
    let target = match output {
        Some(path) => PathBuf::from(path),
        None => cleaned_file_name(input),
    };

    if completeness.is_empty() {
        println!("{} Found no data", "✗".red());
        return Ok(VerifyOutcome {
            blocks,
            completeness,
            written: None,
        });
    }

    println!("\n=== Summary ===");
    print_completeness(&completeness);

    for gap in find_sequence_gaps(&blocks) {
        println!(
            "{} Block {} follows block {}",
            "!".yellow(),
            gap.after,
            gap.before
        );
    }
    for brk in find_address_breaks(&blocks) {
        println!(
            "{} Block {} loads at {:04x}, expected {:04x}",
            "!".yellow(),
            blocks[brk.index].block_no(),
            brk.actual,
            brk.expected
        );
    }

    let mut written = None;
    if completeness.should_write(explicit_target) {
        if let Some(mode) = completeness.output_mode() {
            match mode {
                OutputMode::Create => println!("Creating output file: {}", target.display()),
                OutputMode::Append => println!("Appending to file: {}", target.display()),
            }
            write_blocks(&target, &blocks, mode)?;
            written = Some((target, mode));
        }
    }

    Ok(VerifyOutcome {
        blocks,
        completeness,
        written,
    })
}

/// Write recovered blocks, creating a fresh file or appending to an existing one
pub fn write_blocks(path: &Path, blocks: &[TapeBlock], mode: OutputMode) -> Result<()> {
    let out: Bytes = encode_capture(blocks, mode == OutputMode::Create);

    match mode {
        OutputMode::Create => {
            fs::write(path, &out)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        }
        OutputMode::Append => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open output file: {}", path.display()))?;
            file.write_all(&out)
                .with_context(|| format!("Failed to append to file: {}", path.display()))?;
        }
    }

    info!(
        "Wrote {} blocks ({} bytes) to {}",
        blocks.len(),
        out.len(),
        path.display()
    );

    Ok(())
}

pub(crate) fn print_block(block: &TapeBlock) {
    println!(
        "address={:#06x}, block no={:3}, data size={:3}, raw size={:3}, checksum={:#04x}{}",
        block.load_address(),
        block.block_no(),
        block.data().len(),
        block.total_size(),
        checksum(block.data()),
        if block.is_first_block() { " (after pilot)" } else { "" }
    );
}

pub(crate) fn print_completeness(completeness: &Completeness) {
    if completeness.is_complete() {
        println!("{} All blocks appear to be accounted for", "✓".green());
    }
    if completeness.missing_beginning() {
        println!("{} Missing beginning of file", "✗".red());
    }
    if completeness.missing_end() {
        println!("{} Missing end of file", "✗".red());
    }
}
