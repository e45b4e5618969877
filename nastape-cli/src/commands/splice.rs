use anyhow::{bail, Result};
use colored::*;
use nastape_core::{
    completeness::{assess, find_address_breaks},
    scanner::read_blocks,
    OutputMode, TapeBlock,
};
use std::iter;
use std::path::Path;
use tracing::{info, warn};

use super::read_input;
use super::verify::{print_completeness, write_blocks};

/// What a splice run wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceOutcome {
    /// Blocks written to the output, in order
    pub blocks_written: usize,

    /// Lowest block number written so far
    pub last_block_no: Option<u8>,

    /// Output starts with a pilot and ends with block 0
    pub complete: bool,

    /// Appended blocks whose load address does not follow the block before
    pub address_breaks: usize,
}

/// Merge several partial captures of one tape into a single file
///
/// Captures are taken in the order given. The first one must hold the
/// pilot tone; every later one only contributes blocks numbered below the
/// last block already written. Appended blocks that do not load right after
/// the block before them are reported as a likely different recording.
pub fn execute(inputs: &[String], output: &str) -> Result<SpliceOutcome> {
    if inputs.is_empty() {
        bail!("No input captures given");
    }

    let path = Path::new(output);
    let mut last_written: Option<TapeBlock> = None;
    let mut blocks_written = 0;
    let mut address_breaks = 0;

    for input in inputs {
        let last_block_no = last_written.as_ref().map(|b| b.block_no());
        if last_block_no == Some(0) {
            info!("File already complete, skipping {}", input);
            continue;
        }

        let data = read_input(input)?;
        let report = read_blocks(&data);
        if !report.stop.is_end_of_stream() {
            warn!("{}: {}", input, report.stop);
        }

        let blocks = report.into_blocks();
        let fresh: Vec<TapeBlock> = match last_block_no {
            None => {
                if !assess(&blocks).has_beginning {
                    warn!("{}: no pilot tone before the first block, skipping", input);
                    continue;
                }
                blocks
            }
            Some(last) => blocks.into_iter().filter(|b| b.block_no() < last).collect(),
        };

        let Some(first_new) = fresh.first() else {
            println!("{} {} adds no new blocks", "!".yellow(), input);
            continue;
        };

        let mode = match &last_written {
            Some(prev) => {
                let last = prev.block_no();
                if first_new.block_no() != last - 1 {
                    println!(
                        "{} {} continues at block {}, expected {}",
                        "!".yellow(),
                        input,
                        first_new.block_no(),
                        last - 1
                    );
                }

                let breaks = find_address_breaks(iter::once(prev).chain(&fresh));
                for brk in &breaks {
                    warn!(
                        "{}: block {} loads at {:04x}, expected {:04x}",
                        input,
                        fresh[brk.index - 1].block_no(),
                        brk.actual,
                        brk.expected
                    );
                }
                if !breaks.is_empty() {
                    println!(
                        "{} {} does not continue the load addresses; it may be another recording",
                        "!".yellow(),
                        input
                    );
                }
                address_breaks += breaks.len();

                OutputMode::Append
            }
            None => OutputMode::Create,
        };

        write_blocks(path, &fresh, mode)?;
        println!(
            "{} {}: {} blocks ({} → {})",
            "+".green(),
            input,
            fresh.len(),
            first_new.block_no(),
            fresh[fresh.len() - 1].block_no()
        );

        blocks_written += fresh.len();
        last_written = fresh.last().cloned();
    }

    if blocks_written == 0 {
        bail!("No capture provided the beginning of the file");
    }

    let last_block_no = last_written.as_ref().map(|b| b.block_no());
    let outcome = SpliceOutcome {
        blocks_written,
        last_block_no,
        complete: last_block_no == Some(0),
        address_breaks,
    };

    println!("\n=== Summary ===");
    print_completeness(&nastape_core::Completeness {
        block_count: blocks_written,
        has_beginning: true,
        has_end: outcome.complete,
    });

    Ok(outcome)
}
