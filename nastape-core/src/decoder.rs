//! Block decoding (strict mode)

use crate::checksum::checksum;
use crate::constants::{block_size, BLOCK_MAGIC, DATA_CHECKSUM_LEN, HEADER_LEN};
use crate::error::BlockError;
use crate::scanner::{find_pilot, seek_first_header, LocatedBlock};
use crate::types::{BlockHeader, TapeBlock};
use bytes::Bytes;

/// Decode the next block at or after `cursor`
///
/// This function:
/// 1. Looks for a pilot tone; if one is found the block must start right after it
/// 2. Otherwise resynchronizes on the next block magic
/// 3. Validates the header checksum
/// 4. Validates the data checksum
///
/// The 10-byte trailer is included in the block but never validated, and is
/// cut short if the capture ends inside it.
pub fn decode_block(buf: &Bytes, cursor: usize) -> Result<LocatedBlock, BlockError> {
    let rest = buf.get(cursor..).unwrap_or_default();

    let (start, is_first_block) = match find_pilot(rest) {
        Some(after_pilot) => (cursor + after_pilot, true),
        None => match seek_first_header(rest) {
            Some(pos) => (cursor + pos, false),
            None => return Err(BlockError::EndOfStream),
        },
    };

    let data = &buf[start..];

    let header = BlockHeader::parse(data).ok_or(BlockError::IncompleteHeader {
        expected: HEADER_LEN,
        actual: data.len(),
    })?;

    // The pilot path has not seen the magic yet
    if &data[..BLOCK_MAGIC.len()] != BLOCK_MAGIC {
        let mut bad = [0u8; 5];
        bad.copy_from_slice(&data[..BLOCK_MAGIC.len()]);
        return Err(BlockError::BadMagic(bad));
    }

    let actual = header.computed_checksum();
    if actual != header.checksum {
        return Err(BlockError::HeaderChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    let data_size = header.data_size();
    let needed = HEADER_LEN + data_size + DATA_CHECKSUM_LEN;
    if data.len() < needed {
        return Err(BlockError::BlockIncomplete {
            block_no: header.block_no,
            expected: needed,
            actual: data.len(),
        });
    }

    let expected = data[HEADER_LEN + data_size];
    let actual = checksum(&data[HEADER_LEN..HEADER_LEN + data_size]);
    if actual != expected {
        return Err(BlockError::DataChecksumMismatch {
            block_no: header.block_no,
            expected,
            actual,
        });
    }

    let size = block_size(data_size).min(data.len());
    let raw = buf.slice(start..start + size);

    Ok(LocatedBlock {
        offset: start,
        block: TapeBlock::from_validated(raw, header, is_first_block),
        size,
    })
}

/// Decode the first block of a byte slice
///
/// Returns the block and the number of bytes consumed, i.e. where the
/// remainder of the capture starts.
pub fn decode_block_from_bytes(data: &[u8]) -> Result<(TapeBlock, usize), BlockError> {
    let buf = Bytes::copy_from_slice(data);
    let located = decode_block(&buf, 0)?;
    let end = located.end();
    Ok((located.block, end))
}
