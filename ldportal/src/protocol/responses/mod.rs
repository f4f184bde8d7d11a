// ldportal/src/protocol/responses/mod.rs
//! Reply payloads, decoded by the command they answer.

pub mod light;
pub mod system;
pub mod tag;

pub use light::decode_get_color;
pub use system::{decode_tag_list, decode_wake, TagListEntry};
pub use tag::{decode_read, decode_write};

use crate::protocol::commands::CommandKind;
use crate::types::Color;
use crate::Result;

/// Typed reply to a pending command. Portal replies carry no command byte,
/// so the shape is picked from the command that was registered under the
/// reply's message id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Acknowledgement of a command whose reply has no interpreted payload
    Ack(Vec<u8>),
    /// Wake: portal serial number
    Serial(Vec<u8>),
    /// GetColor: current pad colour
    Color(Color),
    /// Read: tag status and the 16 bytes read (empty on error)
    Page {
        /// Tag status; 0 on success
        status: u8,
        /// Four pages of tag data
        data: Vec<u8>,
    },
    /// Write: tag status only
    Written {
        /// Tag status; 0 on success
        status: u8,
    },
    /// Model: status and the decrypted block
    Model {
        /// Tag status; 0 on success
        status: u8,
        /// Decrypted identity block
        data: Vec<u8>,
    },
    /// Challenge bytes as sent
    Challenge(Vec<u8>),
    /// Tags the portal currently sees
    TagList(Vec<TagListEntry>),
}

impl Reply {
    /// Decode a reply payload for the command registered under its id.
    pub fn decode(kind: CommandKind, data: &[u8]) -> Result<Self> {
        match kind {
            CommandKind::Wake => Ok(Self::Serial(decode_wake(data))),
            CommandKind::GetColor => Ok(Self::Color(decode_get_color(data)?)),
            CommandKind::Read => {
                let (status, data) = decode_read(data)?;
                Ok(Self::Page { status, data })
            }
            CommandKind::Write => Ok(Self::Written {
                status: decode_write(data)?,
            }),
            CommandKind::Model => {
                let (status, data) = decode_read(data)?;
                Ok(Self::Model { status, data })
            }
            CommandKind::Challenge => Ok(Self::Challenge(data.to_vec())),
            CommandKind::TagList => Ok(Self::TagList(decode_tag_list(data)?)),
            _ => Ok(Self::Ack(data.to_vec())),
        }
    }

    /// Tag status byte for replies that carry one.
    pub fn status(&self) -> Option<u8> {
        match self {
            Self::Page { status, .. } | Self::Written { status } | Self::Model { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
