//! Completeness checks and block sequence analysis

use crate::types::TapeBlock;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::debug;

/// How recovered blocks should be written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Start a fresh file with a synthetic pilot
    Create,
    /// Append to a file holding the earlier part of the tape
    Append,
}

/// Completeness of one capture's decoded blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    /// Number of decoded blocks
    pub block_count: usize,

    /// First block followed a pilot tone
    pub has_beginning: bool,

    /// Last block carries block number 0
    pub has_end: bool,
}

impl Completeness {
    /// Check if no block was decoded
    pub fn is_empty(&self) -> bool {
        self.block_count == 0
    }

    /// Check if the capture holds a whole file
    pub fn is_complete(&self) -> bool {
        self.has_beginning && self.has_end
    }

    /// Check if the start of the file is missing
    pub fn missing_beginning(&self) -> bool {
        !self.has_beginning
    }

    /// Check if the end of the file is missing
    pub fn missing_end(&self) -> bool {
        !self.has_end
    }

    /// Output mode for these blocks; `None` when there is nothing to write
    pub fn output_mode(&self) -> Option<OutputMode> {
        if self.is_empty() {
            None
        } else if self.has_beginning {
            Some(OutputMode::Create)
        } else {
            Some(OutputMode::Append)
        }
    }

    /// Decide whether to write output
    ///
    /// Complete captures are written by default; partial ones only when the
    /// caller names an output target.
    pub fn should_write(&self, explicit_target: bool) -> bool {
        !self.is_empty() && (explicit_target || self.is_complete())
    }
}

/// Check whether decoded blocks form a whole file
///
/// Complete means the first block followed a pilot tone and the last block
/// is numbered 0. An empty sequence is missing both ends.
pub fn assess<'a>(blocks: impl IntoIterator<Item = &'a TapeBlock>) -> Completeness {
    let mut iter = blocks.into_iter();
    let Some(first) = iter.next() else {
        return Completeness::default();
    };

    let mut block_count = 1;
    let mut last = first;
    for block in iter {
        block_count += 1;
        last = block;
    }

    let completeness = Completeness {
        block_count,
        has_beginning: first.is_first_block(),
        has_end: last.is_last(),
    };

    #[cfg(feature = "logging")]
    debug!(
        "Assessed {} blocks: beginning={}, end={}",
        block_count, completeness.has_beginning, completeness.has_end
    );

    completeness
}

/// Represents a break in the block number countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGap {
    /// Index of the block after the gap
    pub index: usize,

    /// Block number before the gap
    pub before: u8,

    /// Block number after the gap
    pub after: u8,
}

/// A block whose load address does not follow its predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBreak {
    /// Index of the offending block
    pub index: usize,

    /// Address the previous block ended at
    pub expected: u16,

    /// Address this block loads to
    pub actual: u16,
}

/// Find places where block numbers do not count down by one
///
/// A block following block 0 is reported too: it belongs to a different
/// recording.
pub fn find_sequence_gaps<'a>(blocks: impl IntoIterator<Item = &'a TapeBlock>) -> Vec<SequenceGap> {
    let mut gaps = Vec::new();
    let mut prev: Option<&TapeBlock> = None;

    for (index, block) in blocks.into_iter().enumerate() {
        if let Some(p) = prev {
            if p.is_last() || block.block_no() != p.block_no() - 1 {
                gaps.push(SequenceGap {
                    index,
                    before: p.block_no(),
                    after: block.block_no(),
                });
            }
        }
        prev = Some(block);
    }

    gaps
}

/// Find blocks that do not load right after the previous block's data
pub fn find_address_breaks<'a>(
    blocks: impl IntoIterator<Item = &'a TapeBlock>,
) -> Vec<AddressBreak> {
    let mut breaks = Vec::new();
    let mut prev: Option<&TapeBlock> = None;

    for (index, block) in blocks.into_iter().enumerate() {
        if let Some(p) = prev {
            let expected = p.end_address() as u16;
            if block.load_address() != expected {
                breaks.push(AddressBreak {
                    index,
                    expected,
                    actual: block.load_address(),
                });
            }
        }
        prev = Some(block);
    }

    breaks
}
