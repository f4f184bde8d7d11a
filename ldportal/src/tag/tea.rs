// ldportal/src/tag/tea.rs
//! Tiny Encryption Algorithm, 32 rounds

const DELTA: u32 = 0x9E37_79B9;
const ROUNDS: u32 = 32;

/// Encrypt one 64-bit block.
pub fn encrypt(v: [u32; 2], k: &[u32; 4]) -> [u32; 2] {
    let [mut v0, mut v1] = v;
    let mut sum = 0u32;
    for _ in 0..ROUNDS {
        sum = sum.wrapping_add(DELTA);
        v0 = v0.wrapping_add(
            (v1 << 4).wrapping_add(k[0]) ^ v1.wrapping_add(sum) ^ (v1 >> 5).wrapping_add(k[1]),
        );
        v1 = v1.wrapping_add(
            (v0 << 4).wrapping_add(k[2]) ^ v0.wrapping_add(sum) ^ (v0 >> 5).wrapping_add(k[3]),
        );
    }
    [v0, v1]
}

/// Decrypt one 64-bit block.
pub fn decrypt(v: [u32; 2], k: &[u32; 4]) -> [u32; 2] {
    let [mut v0, mut v1] = v;
    let mut sum = DELTA.wrapping_mul(ROUNDS);
    for _ in 0..ROUNDS {
        v1 = v1.wrapping_sub(
            (v0 << 4).wrapping_add(k[2]) ^ v0.wrapping_add(sum) ^ (v0 >> 5).wrapping_add(k[3]),
        );
        v0 = v0.wrapping_sub(
            (v1 << 4).wrapping_add(k[0]) ^ v1.wrapping_add(sum) ^ (v1 >> 5).wrapping_add(k[1]),
        );
        sum = sum.wrapping_sub(DELTA);
    }
    [v0, v1]
}
