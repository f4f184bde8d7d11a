// ldportal/src/tag/mod.rs
//! Tag identity codec: the obfuscated ids stored on toy tags and the
//! per-tag password.
//!
//! Tag memory used here (NTAG213, 4-byte pages):
//! - 0x24..=0x25: vehicle id (LE u16 + zero padding) or TEA encrypted character id
//! - 0x26: `00 01 00 00` on vehicles
//! - 0x2B: password

pub mod identity;
pub mod scramble;
pub mod tea;

pub use identity::{
    decrypt_character_id, decrypt_vehicle_id, encrypt_character_id, encrypt_vehicle_id, is_vehicle,
};
pub use scramble::derive_password;

use crate::constants::{IDENTITY_PAGE, MARKER_PAGE, VEHICLE_MARKER, WRITE_PAGE_LEN};
use crate::protocol::parser;
use crate::types::Uid;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a tag says it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TagIdentity {
    /// Vehicle id (1000 and up)
    Vehicle(u16),
    /// Character id
    Character(u16),
}

impl TagIdentity {
    /// Numeric id regardless of kind.
    pub fn id(&self) -> u16 {
        match self {
            Self::Vehicle(id) | Self::Character(id) => *id,
        }
    }

    /// `true` for vehicles.
    pub fn is_vehicle(&self) -> bool {
        matches!(self, Self::Vehicle(_))
    }
}

/// Classify a read starting at page 0x24 (at least 12 bytes: pages 0x24..=0x26).
pub fn identify(uid: &Uid, data: &[u8]) -> Result<TagIdentity> {
    let marker_offset = usize::from(MARKER_PAGE - IDENTITY_PAGE) * WRITE_PAGE_LEN;
    let marker = parser::slice_at(data, marker_offset, WRITE_PAGE_LEN)?;
    if is_vehicle(marker) {
        Ok(TagIdentity::Vehicle(decrypt_vehicle_id(data)?))
    } else {
        Ok(TagIdentity::Character(decrypt_character_id(uid, data)?))
    }
}

/// Pages to write to turn a tag into vehicle `id`.
pub fn vehicle_pages(id: u16) -> [(u8, [u8; WRITE_PAGE_LEN]); 2] {
    [
        (IDENTITY_PAGE, encrypt_vehicle_id(id)),
        (MARKER_PAGE, VEHICLE_MARKER),
    ]
}

/// Pages to write to turn the tag with `uid` into character `id`.
pub fn character_pages(uid: &Uid, id: u16) -> [(u8, [u8; WRITE_PAGE_LEN]); 2] {
    let enc = encrypt_character_id(uid, id);
    let mut lo = [0u8; WRITE_PAGE_LEN];
    let mut hi = [0u8; WRITE_PAGE_LEN];
    lo.copy_from_slice(&enc[..4]);
    hi.copy_from_slice(&enc[4..]);
    [(IDENTITY_PAGE, lo), (IDENTITY_PAGE + 1, hi)]
}
