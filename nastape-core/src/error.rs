//! Error types for tape block decoding

use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Reasons a block could not be decoded
///
/// Every variant stops a scan pass; the blocks decoded before it are kept.
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// No further block magic in the remaining bytes
    #[cfg_attr(feature = "std", error("No more blocks in stream"))]
    EndOfStream,

    /// Fewer than a full header's worth of bytes remain
    #[cfg_attr(feature = "std", error("Incomplete header: expected {expected} bytes, got {actual}"))]
    IncompleteHeader {
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually found.
        actual: usize,
    },

    /// Header does not start with the block magic
    #[cfg_attr(feature = "std", error("Invalid header: expected 00 FF FF FF FF, got {0:02X?}"))]
    BadMagic([u8; 5]),

    /// Header checksum does not match bytes 5..=8
    #[cfg_attr(feature = "std", error("Header checksum mismatch: expected {expected:02x}, got {actual:02x}"))]
    HeaderChecksumMismatch {
        /// The checksum stored on tape.
        expected: u8,
        /// The checksum calculated from the header.
        actual: u8,
    },

    /// Header declares more data than the capture holds
    #[cfg_attr(feature = "std", error("Block {block_no} is incomplete: expected {expected} bytes, got {actual}"))]
    BlockIncomplete {
        /// Block number from the header.
        block_no: u8,
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually found.
        actual: usize,
    },

    /// Data checksum does not match the payload
    #[cfg_attr(feature = "std", error("Data checksum mismatch in block {block_no}: expected {expected:02x}, got {actual:02x}"))]
    DataChecksumMismatch {
        /// Block number from the header.
        block_no: u8,
        /// The checksum stored on tape.
        expected: u8,
        /// The checksum calculated from the data.
        actual: u8,
    },

    /// Invalid data handed to the encoder
    #[cfg_attr(feature = "std", error("Invalid block structure: {0}"))]
    InvalidStructure(String),
}

/// Broad category of a [`BlockError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Benign end of scan
    StreamExhausted,
    /// Truncated or misaligned capture
    Structural,
    /// Bit corruption caught by a checksum
    Integrity,
    /// Not produced by decoding
    Other,
}

impl BlockError {
    /// Classify this error
    pub const fn class(&self) -> ErrorClass {
        match self {
            BlockError::EndOfStream => ErrorClass::StreamExhausted,
            BlockError::IncompleteHeader { .. }
            | BlockError::BadMagic(_)
            | BlockError::BlockIncomplete { .. } => ErrorClass::Structural,
            BlockError::HeaderChecksumMismatch { .. }
            | BlockError::DataChecksumMismatch { .. } => ErrorClass::Integrity,
            BlockError::InvalidStructure(_) => ErrorClass::Other,
        }
    }

    /// True when the scan simply ran out of blocks
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self, BlockError::EndOfStream)
    }
}
