// ldportal/src/protocol/responses/system.rs
//! Wake and tag list replies.

use crate::constants::WAKE_SERIAL_OFFSET;
use crate::protocol::parser;
use crate::types::{Pad, TagType};
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One `(pad << 4 | index, type)` pair of a TagList reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TagListEntry {
    /// Pad the tag sits on
    pub pad: Pad,
    /// Tag slot index
    pub index: u8,
    /// Tag family
    pub tag_type: TagType,
}

/// Wake reply: the serial number follows a fixed 10-byte prefix.
pub fn decode_wake(data: &[u8]) -> Vec<u8> {
    parser::tail_from(data, WAKE_SERIAL_OFFSET).to_vec()
}

/// TagList reply. A trailing odd byte is ignored.
pub fn decode_tag_list(data: &[u8]) -> Result<Vec<TagListEntry>> {
    data.chunks_exact(2)
        .map(|pair| {
            Ok(TagListEntry {
                pad: Pad::try_from(pair[0] >> 4)?,
                index: pair[0] & 0x0f,
                tag_type: TagType::new(pair[1]),
            })
        })
        .collect()
}
