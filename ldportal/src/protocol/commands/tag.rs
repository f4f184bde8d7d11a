// ldportal/src/protocol/commands/tag.rs
//! Tag read/write and password payload encoders.

use crate::constants::WRITE_PAGE_LEN;
use crate::types::PasswordPolicy;

/// Read (0xD2): tag index + first page. The portal returns 16 bytes (4 pages).
pub fn encode_read(index: u8, page: u8) -> Vec<u8> {
    vec![index, page]
}

/// Write (0xD3): tag index + page + 4 bytes
pub fn encode_write(index: u8, page: u8, data: &[u8; WRITE_PAGE_LEN]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + WRITE_PAGE_LEN);
    buf.push(index);
    buf.push(page);
    buf.extend_from_slice(data);
    buf
}

/// Model (0xD4): 8 encrypted bytes naming the tag to query
pub fn encode_model(data: &[u8; 8]) -> Vec<u8> {
    data.to_vec()
}

/// ConfigPassword (0xE1): policy + tag index + 4-byte password.
/// The password is only meaningful with `PasswordPolicy::Custom`.
pub fn encode_config_password(policy: PasswordPolicy, index: u8, password: &[u8; 4]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(6);
    buf.push(policy as u8);
    buf.push(index);
    buf.extend_from_slice(password);
    buf
}
