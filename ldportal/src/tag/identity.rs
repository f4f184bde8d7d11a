// ldportal/src/tag/identity.rs
//! Vehicle and character id encoding on tag pages.

use super::{scramble, tea};
use crate::constants::VEHICLE_MARKER;
use crate::protocol::parser;
use crate::types::Uid;
use crate::Result;

/// Vehicle id as stored at page 0x24: little-endian u16, upper half zero.
pub fn encrypt_vehicle_id(id: u16) -> [u8; 4] {
    let [lo, hi] = id.to_le_bytes();
    [lo, hi, 0x00, 0x00]
}

/// Inverse of `encrypt_vehicle_id`. Only the first two bytes matter.
pub fn decrypt_vehicle_id(data: &[u8]) -> Result<u16> {
    parser::le_u16_at(data, 0)
}

/// Character id as stored at pages 0x24..=0x25. Bound to the tag UID.
pub fn encrypt_character_id(uid: &Uid, id: u16) -> [u8; 8] {
    let key = scramble::character_key(uid);
    let word = u32::from(id);
    let [v0, v1] = tea::encrypt([word, word], &key);
    let mut out = [0u8; 8];
    out[..4].copy_from_slice(&v0.to_le_bytes());
    out[4..].copy_from_slice(&v1.to_le_bytes());
    out
}

/// Inverse of `encrypt_character_id` for the same UID.
pub fn decrypt_character_id(uid: &Uid, data: &[u8]) -> Result<u16> {
    let v0 = parser::le_u32_at(data, 0)?;
    let v1 = parser::le_u32_at(data, 4)?;
    let key = scramble::character_key(uid);
    let [id, _] = tea::decrypt([v0, v1], &key);
    Ok(id as u16)
}

/// True when the page 0x26 marker says "vehicle".
pub fn is_vehicle(marker: &[u8]) -> bool {
    marker == VEHICLE_MARKER
}
