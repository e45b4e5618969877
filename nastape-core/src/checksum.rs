//! Rollover checksum used for both header and data

/// Sum all bytes with 8-bit rollover
///
/// The tape format's only integrity check. Equivalent to the byte sum modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}
