// ldportal/src/tag/scramble.rs
//! Password and key derivation from the tag UID.

use crate::types::Uid;

/// Salt appended to the UID when deriving the tag password.
/// "(c) Copyright LEGO 2014" + AA AA, 32 bytes with the UID.
const PASSWORD_SALT: &[u8; 25] = b"(c) Copyright LEGO 2014\xAA\xAA";

/// Salt appended to the UID when deriving the character key words.
const KEY_SALT: [u8; 17] = [
    0xB7, 0xD5, 0xD7, 0xE6, 0xE7, 0xBA, 0x3C, 0xA8, 0xD8, 0x75, 0x47, 0x68, 0xCF, 0x23, 0xE9, 0xFE,
    0xAA,
];

const BUF_LEN: usize = 32;

/// Mix the first `count` little-endian words of `uid || salt`.
/// The last byte of the mixed range is forced to 0xAA.
fn scramble(uid: &Uid, salt: &[u8], count: usize) -> u32 {
    let mut buf = [0u8; BUF_LEN];
    let uid = uid.as_bytes();
    buf[..uid.len()].copy_from_slice(uid);
    buf[uid.len()..uid.len() + salt.len()].copy_from_slice(salt);
    buf[count * 4 - 1] = 0xAA;

    buf.chunks_exact(4).take(count).fold(0u32, |v, w| {
        u32::from_le_bytes([w[0], w[1], w[2], w[3]])
            .wrapping_add(v.rotate_right(25))
            .wrapping_add(v.rotate_right(10))
            .wrapping_sub(v)
    })
}

/// 4-byte NTAG password the portal uses in automatic mode (page 0x2B).
pub fn derive_password(uid: &Uid) -> [u8; 4] {
    scramble(uid, PASSWORD_SALT, 8).to_le_bytes()
}

/// TEA key bound to the tag UID.
pub fn character_key(uid: &Uid) -> [u32; 4] {
    [
        scramble(uid, &KEY_SALT, 3),
        scramble(uid, &KEY_SALT, 4),
        scramble(uid, &KEY_SALT, 5),
        scramble(uid, &KEY_SALT, 6),
    ]
}
