//! Core types for decoded tape blocks

use crate::checksum::checksum;
use crate::constants::{
    data_size_from_byte, BLOCK_NO_OFFSET, DATA_CHECKSUM_LEN, HEADER_CHECKSUM_OFFSET, HEADER_LEN,
    LAST_BLOCK_NO, LOAD_ADDRESS_OFFSET, SIZE_OFFSET,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Parsed block header (the 10 bytes starting at the magic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Address the data is loaded to
    pub load_address: u16,

    /// Raw size byte; `0` means 256 bytes of data
    pub size: u8,

    /// Blocks remaining after this one; `0` marks the last block
    pub block_no: u8,

    /// Header checksum as stored on tape
    pub checksum: u8,
}

impl BlockHeader {
    /// Build a header, computing its checksum
    pub fn new(load_address: u16, size: u8, block_no: u8) -> Self {
        let [lo, hi] = load_address.to_le_bytes();
        Self {
            load_address,
            size,
            block_no,
            checksum: checksum(&[lo, hi, size, block_no]),
        }
    }

    /// Read the header fields from bytes starting at the magic
    ///
    /// Returns `None` if fewer than [`HEADER_LEN`] bytes are given. The magic
    /// and checksum are not validated here.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < HEADER_LEN {
            return None;
        }
        Some(Self {
            load_address: u16::from_le_bytes([
                data[LOAD_ADDRESS_OFFSET],
                data[LOAD_ADDRESS_OFFSET + 1],
            ]),
            size: data[SIZE_OFFSET],
            block_no: data[BLOCK_NO_OFFSET],
            checksum: data[HEADER_CHECKSUM_OFFSET],
        })
    }

    /// Checksum over load address, size and block number
    pub fn computed_checksum(&self) -> u8 {
        let [lo, hi] = self.load_address.to_le_bytes();
        checksum(&[lo, hi, self.size, self.block_no])
    }

    /// Number of data bytes this header declares
    pub const fn data_size(&self) -> usize {
        data_size_from_byte(self.size)
    }

    /// Check if this is the final block of a file
    pub const fn is_last(&self) -> bool {
        self.block_no == LAST_BLOCK_NO
    }
}

/// One decoded, checksum-verified tape block
///
/// Only the decoder creates these, so every accessor is backed by a raw
/// range that passed both the header and the data checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeBlock {
    raw: Bytes,
    header: BlockHeader,
    is_first_block: bool,
}

impl TapeBlock {
    pub(crate) fn from_validated(raw: Bytes, header: BlockHeader, is_first_block: bool) -> Self {
        Self {
            raw,
            header,
            is_first_block,
        }
    }

    /// Raw bytes from the magic through the trailer, exactly as captured
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Parsed header
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// True if a pilot tone was found directly before this block
    pub fn is_first_block(&self) -> bool {
        self.is_first_block
    }

    /// Get load address
    pub fn load_address(&self) -> u16 {
        self.header.load_address
    }

    /// Get block number
    pub fn block_no(&self) -> u8 {
        self.header.block_no
    }

    /// Check if this is the final block of a file
    pub fn is_last(&self) -> bool {
        self.header.is_last()
    }

    /// Number of data bytes
    pub fn data_size(&self) -> usize {
        self.header.data_size()
    }

    /// Data payload
    pub fn data(&self) -> &[u8] {
        &self.raw[HEADER_LEN..HEADER_LEN + self.data_size()]
    }

    /// Data checksum as stored after the payload
    pub fn data_checksum(&self) -> u8 {
        self.raw[HEADER_LEN + self.data_size()]
    }

    /// Trailer bytes following the data checksum (may be short on a truncated capture)
    pub fn trailer(&self) -> &[u8] {
        &self.raw[HEADER_LEN + self.data_size() + DATA_CHECKSUM_LEN..]
    }

    /// Calculate the total block size in bytes
    pub fn total_size(&self) -> usize {
        self.raw.len()
    }

    /// Address one past the last byte this block loads
    pub fn end_address(&self) -> u32 {
        self.header.load_address as u32 + self.data_size() as u32
    }
}
