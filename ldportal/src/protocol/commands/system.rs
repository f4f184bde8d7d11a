// ldportal/src/protocol/commands/system.rs
//! Wake, challenge and tag list payload encoders.

use crate::constants::WAKE_GREETING;

/// Wake (0xB0). The portal stays silent until it sees this greeting.
pub fn encode_wake() -> Vec<u8> {
    WAKE_GREETING.to_vec()
}

/// ConfigActive (0xE5): enable/disable NFC scanning
pub fn encode_config_active(enabled: bool) -> Vec<u8> {
    vec![enabled as u8]
}
