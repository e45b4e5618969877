//! Stream scanner for noisy or truncated tape captures

use crate::completeness::{assess, Completeness};
use crate::constants::{BLOCK_MAGIC, PILOT_LEN};
use crate::decoder::decode_block;
use crate::error::{BlockError, ErrorClass};
use crate::types::TapeBlock;
use alloc::vec::Vec;
use bytes::Bytes;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// A block found at a specific offset in the capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedBlock {
    /// Byte offset of the block magic
    pub offset: usize,

    /// The decoded block
    pub block: TapeBlock,

    /// Bytes covered by the block, trailer included
    pub size: usize,
}

impl LocatedBlock {
    /// Offset one past the block's last byte
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Result of one scan pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Blocks decoded before the scan stopped, in capture order
    pub blocks: Vec<LocatedBlock>,

    /// Why the scan stopped
    pub stop: BlockError,
}

impl ScanReport {
    /// Check whether any block was decoded
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the decoded blocks
    pub fn tape_blocks(&self) -> impl Iterator<Item = &TapeBlock> {
        self.blocks.iter().map(|located| &located.block)
    }

    /// Drop offsets and keep the blocks
    pub fn into_blocks(self) -> Vec<TapeBlock> {
        self.blocks.into_iter().map(|located| located.block).collect()
    }

    /// Completeness of the decoded block sequence
    pub fn completeness(&self) -> Completeness {
        assess(self.tape_blocks())
    }
}

/// Find the end of the first pilot tone
///
/// Counts consecutive zero bytes and returns the index right after the
/// 256th one. The index must lie inside `data`, so a capture that ends
/// exactly on the pilot reports `None`.
pub fn find_pilot(data: &[u8]) -> Option<usize> {
    let mut run = 0usize;
    for (idx, &byte) in data.iter().enumerate() {
        if run == PILOT_LEN {
            return Some(idx);
        }
        if byte == 0 {
            run += 1;
        } else {
            run = 0;
        }
    }
    None
}

/// Find the next occurrence of the block magic
pub fn seek_first_header(data: &[u8]) -> Option<usize> {
    memchr::memmem::find(data, BLOCK_MAGIC)
}

/// Decode consecutive blocks until one fails
///
/// Stops at the first failure of any kind; the blocks before it are kept
/// and nothing after it is examined.
pub fn read_blocks(data: &[u8]) -> ScanReport {
    read_blocks_zero_copy(Bytes::copy_from_slice(data))
}

/// Like [`read_blocks`], but the returned blocks slice `buf` without copying
pub fn read_blocks_zero_copy(buf: Bytes) -> ScanReport {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    #[cfg(feature = "logging")]
    debug!("Starting tape scan of {} bytes", buf.len());

    let stop = loop {
        match decode_block(&buf, cursor) {
            Ok(located) => {
                #[cfg(feature = "logging")]
                debug!(
                    "Decoded block {} at offset {} (load address {:04x}, {} data bytes{})",
                    located.block.block_no(),
                    located.offset,
                    located.block.load_address(),
                    located.block.data_size(),
                    if located.block.is_first_block() {
                        ", after pilot"
                    } else {
                        ""
                    }
                );

                cursor = located.end();
                blocks.push(located);
            }
            Err(e) => break e,
        }
    };

    #[cfg(feature = "logging")]
    if !stop.is_end_of_stream() {
        warn!("Scan stopped at offset {}: {:?}", cursor, stop);
    }

    #[cfg(feature = "logging")]
    debug!(
        "Scan complete: found {} valid blocks out of {} bytes scanned",
        blocks.len(),
        buf.len()
    );

    ScanReport { blocks, stop }
}

/// Scan statistics
#[derive(Debug, Clone)]
pub struct ScanStats {
    /// Total bytes scanned
    pub bytes_scanned: usize,

    /// Number of valid blocks found
    pub blocks_found: usize,

    /// Total bytes recovered (sum of all valid block sizes)
    pub bytes_recovered: usize,

    /// Whether the capture holds a pilot tone anywhere
    pub pilot_found: bool,

    /// Category of the error that ended the scan
    pub stop_class: ErrorClass,
}

impl ScanStats {
    /// Calculate recovery rate as a percentage
    pub fn recovery_rate(&self) -> f64 {
        if self.bytes_scanned == 0 {
            0.0
        } else {
            (self.bytes_recovered as f64 / self.bytes_scanned as f64) * 100.0
        }
    }
}

/// Scan a capture with statistics
pub fn scan_stream_with_stats(data: &[u8]) -> (ScanReport, ScanStats) {
    let report = read_blocks(data);

    let stats = ScanStats {
        bytes_scanned: data.len(),
        blocks_found: report.blocks.len(),
        bytes_recovered: report.blocks.iter().map(|b| b.size).sum(),
        pilot_found: find_pilot(data).is_some(),
        stop_class: report.stop.class(),
    };

    (report, stats)
}
