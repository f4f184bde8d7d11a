// ldportal/src/protocol/responses/tag.rs
//! Tag read and write reply payloads.

use crate::protocol::parser;
use crate::Result;

/// Decode Read/Model reply.
/// Layout: status(1) + data(N). Status 0 means the tag answered.
pub fn decode_read(data: &[u8]) -> Result<(u8, Vec<u8>)> {
    let status = parser::byte_at(data, 0)?;
    Ok((status, parser::tail_from(data, 1).to_vec()))
}

/// Decode Write reply: status(1), 0 = written
pub fn decode_write(data: &[u8]) -> Result<u8> {
    parser::byte_at(data, 0)
}
