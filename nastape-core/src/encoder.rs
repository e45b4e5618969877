//! Block encoding

use crate::checksum::checksum;
use crate::constants::{size_byte_for, BLOCK_MAGIC, MAX_DATA_SIZE, PILOT_LEN, TRAILER_LEN};
use crate::error::BlockError;
use crate::types::{BlockHeader, TapeBlock};
use alloc::format;
use bytes::{BufMut, Bytes, BytesMut};

/// Encode a block into bytes
///
/// The block is encoded with the following layout:
/// 1. Magic (5 bytes): `00 FF FF FF FF`
/// 2. Header:
///    - Load address (2 bytes, little-endian)
///    - Size (1 byte, `00` for 256)
///    - Block number (1 byte)
///    - Header checksum (1 byte, taken from `header.checksum`)
/// 3. Data (1 to 256 bytes)
/// 4. Data checksum (1 byte)
/// 5. Trailer (10 null bytes)
pub fn encode_block(header: &BlockHeader, data: &[u8]) -> Result<Bytes, BlockError> {
    if data.is_empty() || data.len() > MAX_DATA_SIZE {
        return Err(BlockError::InvalidStructure(format!(
            "Data length {} outside 1..={}",
            data.len(),
            MAX_DATA_SIZE
        )));
    }

    if header.data_size() != data.len() {
        return Err(BlockError::InvalidStructure(format!(
            "Data length mismatch: header says {}, actual {}",
            header.data_size(),
            data.len()
        )));
    }

    let mut buf = BytesMut::with_capacity(crate::constants::block_size(data.len()));

    buf.put_slice(BLOCK_MAGIC);
    buf.put_u16_le(header.load_address);
    buf.put_u8(header.size);
    buf.put_u8(header.block_no);
    buf.put_u8(header.checksum);

    buf.put_slice(data);
    buf.put_u8(checksum(data));

    buf.put_bytes(0, TRAILER_LEN);

    Ok(buf.freeze())
}

/// Builder for constructing blocks
pub struct BlockBuilder {
    load_address: u16,
    block_no: u8,
    data: Bytes,
}

impl BlockBuilder {
    /// Create a new block builder
    pub fn new(block_no: u8) -> Self {
        Self {
            load_address: 0,
            block_no,
            data: Bytes::new(),
        }
    }

    /// Set the load address
    pub fn load_address(mut self, address: u16) -> Self {
        self.load_address = address;
        self
    }

    /// Set the data payload
    pub fn data(mut self, data: Bytes) -> Self {
        self.data = data;
        self
    }

    /// Build the header without encoding
    pub fn build_header(&self) -> Result<BlockHeader, BlockError> {
        let size = size_byte_for(self.data.len()).ok_or_else(|| {
            BlockError::InvalidStructure(format!(
                "Data length {} outside 1..={}",
                self.data.len(),
                MAX_DATA_SIZE
            ))
        })?;

        Ok(BlockHeader::new(self.load_address, size, self.block_no))
    }

    /// Build and encode the block
    pub fn build(self) -> Result<Bytes, BlockError> {
        let header = self.build_header()?;
        encode_block(&header, &self.data)
    }
}

/// Encode a whole program the way the machine writes it
///
/// Emits a pilot tone followed by 256-byte blocks (the last one may be
/// shorter). Block numbers count down to 0 and load addresses advance by
/// each block's data size.
pub fn encode_tape(load_address: u16, program: &[u8]) -> Result<Bytes, BlockError> {
    let block_count = program.len().div_ceil(MAX_DATA_SIZE);
    if block_count == 0 || block_count > u8::MAX as usize + 1 {
        return Err(BlockError::InvalidStructure(format!(
            "Program of {} bytes does not fit in 1..=256 blocks",
            program.len()
        )));
    }

    let mut buf = BytesMut::with_capacity(
        PILOT_LEN + program.len() + block_count * crate::constants::block_size(0),
    );
    buf.put_bytes(0, PILOT_LEN);

    let mut address = load_address;
    for (i, chunk) in program.chunks(MAX_DATA_SIZE).enumerate() {
        let block_no = (block_count - 1 - i) as u8;
        let block = BlockBuilder::new(block_no)
            .load_address(address)
            .data(Bytes::copy_from_slice(chunk))
            .build()?;
        buf.put_slice(&block);
        address = address.wrapping_add(chunk.len() as u16);
    }

    Ok(buf.freeze())
}

/// Assemble decoded blocks into output bytes
///
/// With `with_pilot` a synthetic pilot is prepended so the result starts a
/// fresh file. Without it the raw blocks are only concatenated, ready to be
/// appended to an existing file, whatever lead-in the capture had.
pub fn encode_capture<'a>(
    blocks: impl IntoIterator<Item = &'a TapeBlock>,
    with_pilot: bool,
) -> Bytes {
    let mut buf = BytesMut::new();

    if with_pilot {
        buf.put_bytes(0, PILOT_LEN);
    }

    for block in blocks {
        buf.put_slice(block.raw());
    }

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HEADER_LEN, MAX_BLOCK_SIZE};
    use crate::scanner::read_blocks;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn test_encode_simple_block() {
        let encoded = BlockBuilder::new(0)
            .load_address(0x0C80)
            .data(Bytes::from_static(&[1, 2, 3, 4, 5]))
            .build()
            .unwrap();

        assert_eq!(&encoded[0..5], BLOCK_MAGIC);
        assert_eq!(&encoded[5..7], &[0x80, 0x0C]);
        assert_eq!(encoded[7], 5);
        assert_eq!(encoded[8], 0);
        assert_eq!(encoded[9], 0x91);
        assert_eq!(&encoded[HEADER_LEN..HEADER_LEN + 5], &[1, 2, 3, 4, 5]);
        assert_eq!(encoded[HEADER_LEN + 5], 15);
        assert_eq!(&encoded[HEADER_LEN + 6..], &[0u8; 10]);
    }

    #[test]
    fn test_encode_rejects_bad_lengths() {
        assert!(BlockBuilder::new(0).build().is_err());
        assert!(BlockBuilder::new(0)
            .data(Bytes::from(vec![0u8; 257]))
            .build()
            .is_err());

        let header = BlockHeader::new(0, 4, 0);
        assert!(encode_block(&header, b"abc").is_err());
    }

    #[test]
    fn test_encode_full_block_size_byte() {
        let encoded = BlockBuilder::new(3)
            .data(Bytes::from(vec![0xAA; 256]))
            .build()
            .unwrap();

        assert_eq!(encoded[7], 0);
        assert_eq!(encoded.len(), MAX_BLOCK_SIZE);
    }

    #[test]
    fn test_encode_tape_layout() {
        let program = vec![0x55u8; 300];
        let tape = encode_tape(0xFFF0, &program).unwrap();

        let report = read_blocks(&tape);
        let blocks = report.into_blocks();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].block_no(), 1);
        assert_eq!(blocks[0].load_address(), 0xFFF0);
        assert_eq!(blocks[0].data_size(), 256);
        assert_eq!(blocks[1].block_no(), 0);
        assert_eq!(blocks[1].load_address(), 0x00F0);
        assert_eq!(blocks[1].data_size(), 44);
    }

    #[test]
    fn test_encode_tape_limits() {
        assert!(encode_tape(0, &[]).is_err());
        assert!(encode_tape(0, &vec![1u8; 256 * 256]).is_ok());
        assert!(encode_tape(0, &vec![1u8; 256 * 256 + 1]).is_err());
    }

    #[test]
    fn test_encode_capture_reproduces_clean_tape() {
        let tape = encode_tape(0x1000, b"10 PRINT \"HELLO\"").unwrap();
        let blocks = read_blocks(&tape).into_blocks();

        assert_eq!(encode_capture(&blocks, true), tape);
    }

    #[test]
    fn test_encode_capture_without_pilot() {
        let tape = encode_tape(0x1000, &[7u8; 400]).unwrap();
        let blocks: Vec<_> = read_blocks(&tape).into_blocks().into_iter().skip(1).collect();

        let out = encode_capture(&blocks, false);

        assert_eq!(out.as_ref(), &tape[PILOT_LEN + MAX_BLOCK_SIZE..]);
    }

    #[test]
    fn test_encode_capture_append_drops_lead_in() {
        let tape = encode_tape(0x1000, &[7u8; 400]).unwrap();
        let blocks = read_blocks(&tape).into_blocks();
        assert!(blocks[0].is_first_block());

        let out = encode_capture(&blocks, false);

        assert_eq!(out.as_ref(), &tape[PILOT_LEN..]);
    }
}
