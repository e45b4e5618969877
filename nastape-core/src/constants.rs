//! Constants for the NASCOM cassette block format
//!
//! Layout written by the NAS-SYS `W` command:
//!
//! ```text
//! pilot:   256 x 00                              (first block only)
//! header:  00 FF FF FF FF  addr_lo addr_hi size block_no hdr_csum
//! data:    1..=256 bytes                          (size 00 means 256)
//! csum:    1 byte, rollover sum of data
//! trailer: 10 x 00                                (not validated)
//! ```

/// Number of consecutive zero bytes that make up a pilot tone
pub const PILOT_LEN: usize = 256;

/// Magic prefix at the start of every block header
pub const BLOCK_MAGIC: &[u8; 5] = b"\x00\xFF\xFF\xFF\xFF";

/// Full header length: magic + load address (2) + size + block number + header checksum
pub const HEADER_LEN: usize = 10;

/// Offset of the load address low byte (little-endian u16)
pub const LOAD_ADDRESS_OFFSET: usize = 5;

/// Offset of the size byte
pub const SIZE_OFFSET: usize = 7;

/// Offset of the block number byte
pub const BLOCK_NO_OFFSET: usize = 8;

/// Offset of the header checksum byte
pub const HEADER_CHECKSUM_OFFSET: usize = 9;

/// Largest data payload a single block can carry
pub const MAX_DATA_SIZE: usize = 256;

/// Length of the data checksum that follows the payload
pub const DATA_CHECKSUM_LEN: usize = 1;

/// Null bytes written after each block
pub const TRAILER_LEN: usize = 10;

/// Block number carried by the final block of a file
pub const LAST_BLOCK_NO: u8 = 0;

/// Smallest possible block on tape (1 data byte)
pub const MIN_BLOCK_SIZE: usize = HEADER_LEN + 1 + DATA_CHECKSUM_LEN + TRAILER_LEN;

/// Largest possible block on tape (256 data bytes)
pub const MAX_BLOCK_SIZE: usize = HEADER_LEN + MAX_DATA_SIZE + DATA_CHECKSUM_LEN + TRAILER_LEN;

/// Decode the size byte into a data length (`0` encodes 256)
pub const fn data_size_from_byte(size: u8) -> usize {
    if size == 0 {
        MAX_DATA_SIZE
    } else {
        size as usize
    }
}

/// Encode a data length into the size byte; `None` when out of range
pub const fn size_byte_for(len: usize) -> Option<u8> {
    if len == 0 || len > MAX_DATA_SIZE {
        None
    } else if len == MAX_DATA_SIZE {
        Some(0)
    } else {
        Some(len as u8)
    }
}

/// Total on-tape block size for a given data length, trailer included
pub const fn block_size(data_size: usize) -> usize {
    HEADER_LEN + data_size + DATA_CHECKSUM_LEN + TRAILER_LEN
}
