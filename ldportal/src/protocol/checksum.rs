// ldportal/src/protocol/checksum.rs
//! Frame checksum.

/// Compute the frame checksum: low byte of the sum of every preceding byte
/// (start marker included).
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}
