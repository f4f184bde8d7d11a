// ldportal/src/protocol/event.rs
//! Tag presence events sent by the portal on its own.

use crate::constants::EVENT_PAYLOAD_LEN;
use crate::protocol::frame::{Frame, Message, MessageKind};
use crate::protocol::parser;
use crate::types::{Pad, TagType, Uid};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction byte of an event frame.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Tag put on a pad
    Placed = 0,
    /// Tag taken off
    Removed = 1,
}

/// Decoded tag presence change.
/// Layout: pad(1) + type(1) + index(1) + direction(1) + uid(7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPresence {
    /// Pad the tag sits on
    pub pad: Pad,
    /// Tag family
    pub tag_type: TagType,
    /// Slot index used to address the tag in read/write commands
    pub index: u8,
    /// Placed or removed
    pub direction: Direction,
    /// Tag UID
    pub uid: Uid,
}

impl TagPresence {
    /// Parse an 11-byte event payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        parser::ensure_len(payload, EVENT_PAYLOAD_LEN)?;
        let pad = Pad::try_from(parser::byte_at(payload, 0)?)?;
        if !pad.is_physical() {
            return Err(Error::InvalidPad(pad.as_u8()));
        }
        // Anything but zero reads as a removal
        let direction = if parser::byte_at(payload, 3)? == 0 {
            Direction::Placed
        } else {
            Direction::Removed
        };
        Ok(Self {
            pad,
            tag_type: TagType::new(parser::byte_at(payload, 1)?),
            index: parser::byte_at(payload, 2)?,
            direction,
            uid: parser::uid_at(payload, 4)?,
        })
    }

    /// Parse a decoded event message.
    pub fn from_message(msg: &Message) -> Result<Self> {
        if msg.kind() != MessageKind::Event {
            return Err(Error::MalformedFrame("not an event frame".into()));
        }
        Self::from_payload(msg.payload())
    }

    /// `true` when the tag was placed.
    pub fn is_present(&self) -> bool {
        self.direction == Direction::Placed
    }

    /// 11-byte event payload.
    pub fn payload(&self) -> [u8; EVENT_PAYLOAD_LEN] {
        let mut buf = [0u8; EVENT_PAYLOAD_LEN];
        buf[0] = self.pad.as_u8();
        buf[1] = self.tag_type.as_u8();
        buf[2] = self.index;
        buf[3] = self.direction as u8;
        buf[4..].copy_from_slice(self.uid.as_bytes());
        buf
    }

    /// Encode as the portal would send it.
    pub fn to_frame(&self) -> Result<Frame> {
        Frame::event(&self.payload())
    }
}
