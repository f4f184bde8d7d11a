// ldportal/src/protocol/frame.rs
//! Raw frames and the decoded `Message` view.

use crate::constants::{
    EVENT_PAYLOAD_LEN, EVENT_START, FRAME_SIZE, FRAME_START, HOST_HEADER_LEN, MAX_HOST_PAYLOAD,
    MAX_LEN_FIELD, NO_MESSAGE_ID, PORTAL_HEADER_LEN,
};
use crate::protocol::checksum::checksum;
use crate::protocol::commands::CommandKind;
use crate::types::Pad;
use crate::{Error, Result};

/// Toy pad wire frame. Always 32 bytes.
/// Host:   [0x55] [Len] [Cmd] [Id] [Payload(n)] [Sum] [0x00 padding]
/// Portal: [0x55] [Len] [Id] [Payload(n)] [Sum] [0x00 padding]
/// Event:  [0x56] [Len] [Pad] [Type] [Index] [Dir] [Uid(7)] [Sum] [0x00 padding]
/// Len counts every byte between itself and the checksum.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_SIZE],
}

/// Who produced a frame. Host frames carry a command byte, portal
/// responses do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Sent by the host: carries a command byte
    Host,
    /// Sent by the portal
    Portal,
}

/// Frame family, told apart by the start marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Unsolicited tag presence change
    Event,
    /// Command, or the portal's reply to one
    Normal,
}

/// Decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    kind: MessageKind,
    command: Option<CommandKind>,
    id: u8,
    payload: Vec<u8>,
}

impl Frame {
    /// Encode a host command frame.
    pub fn encode(command: CommandKind, id: u8, payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX_HOST_PAYLOAD {
            return Err(Error::PayloadTooLarge {
                max: MAX_HOST_PAYLOAD,
                actual: payload.len(),
            });
        }
        Ok(Self::build(FRAME_START, &[command.code(), id], payload))
    }

    /// Encode a portal response frame (the device side of the protocol).
    pub fn response(id: u8, payload: &[u8]) -> Result<Self> {
        let max = FRAME_SIZE - PORTAL_HEADER_LEN - 1;
        if payload.len() > max {
            return Err(Error::PayloadTooLarge {
                max,
                actual: payload.len(),
            });
        }
        Ok(Self::build(FRAME_START, &[id], payload))
    }

    /// Encode an event frame from its 11-byte payload.
    pub fn event(payload: &[u8]) -> Result<Self> {
        if payload.len() != EVENT_PAYLOAD_LEN {
            return Err(Error::InvalidLength {
                expected: EVENT_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }
        Ok(Self::build(EVENT_START, &[], payload))
    }

    fn build(start: u8, head: &[u8], payload: &[u8]) -> Self {
        let len = head.len() + payload.len();
        let mut bytes = [0u8; FRAME_SIZE];
        bytes[0] = start;
        bytes[1] = len as u8;
        bytes[2..2 + head.len()].copy_from_slice(head);
        bytes[2 + head.len()..2 + len].copy_from_slice(payload);
        bytes[2 + len] = checksum(&bytes[..2 + len]);
        Self { bytes }
    }

    /// Wrap raw bytes read from a transport.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != FRAME_SIZE {
            return Err(Error::MalformedFrame(format!(
                "expected {} bytes, got {}",
                FRAME_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; FRAME_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }

    /// Consume into the raw 32 bytes.
    pub fn into_bytes(self) -> [u8; FRAME_SIZE] {
        self.bytes
    }

    /// Decode as a frame written by `source`.
    pub fn decode(&self, source: Source) -> Result<Message> {
        Message::decode(&self.bytes, source)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({})", crate::utils::bytes_to_hex_spaced(&self.bytes))
    }
}

impl Message {
    /// Build a host command message.
    pub fn command(command: CommandKind, id: u8, payload: Vec<u8>) -> Self {
        Self {
            kind: MessageKind::Normal,
            command: Some(command),
            id,
            payload,
        }
    }

    /// Build a plain portal reply.
    pub fn reply(id: u8, payload: Vec<u8>) -> Self {
        Self {
            kind: MessageKind::Normal,
            command: None,
            id,
            payload,
        }
    }

    /// Event or normal frame.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Command carried by a host frame, `None` for portal replies and events.
    pub fn command_kind(&self) -> Option<CommandKind> {
        self.command
    }

    /// Message id; 0 for events.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Payload without header or checksum.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// `true` for tag presence events.
    pub fn is_event(&self) -> bool {
        self.kind == MessageKind::Event
    }

    /// Encode back into a frame. Events and replies use the portal layout.
    pub fn encode(&self) -> Result<Frame> {
        match (self.kind, self.command) {
            (MessageKind::Event, _) => Frame::event(&self.payload),
            (MessageKind::Normal, Some(cmd)) => Frame::encode(cmd, self.id, &self.payload),
            (MessageKind::Normal, None) => Frame::response(self.id, &self.payload),
        }
    }

    /// Decode a full 32-byte frame.
    pub fn decode(bytes: &[u8], source: Source) -> Result<Self> {
        if bytes.len() != FRAME_SIZE {
            return Err(Error::MalformedFrame(format!(
                "expected {} bytes, got {}",
                FRAME_SIZE,
                bytes.len()
            )));
        }

        let start = bytes[0];
        if start != FRAME_START && start != EVENT_START {
            return Err(Error::MalformedFrame(format!(
                "invalid start marker {:#04x}",
                start
            )));
        }

        let len = bytes[1] as usize;
        if len > MAX_LEN_FIELD {
            return Err(Error::MalformedFrame(format!(
                "declared length {} exceeds frame capacity",
                len
            )));
        }

        let end = 2 + len;
        let expected = checksum(&bytes[..end]);
        if bytes[end] != expected {
            return Err(Error::ChecksumMismatch {
                expected,
                actual: bytes[end],
            });
        }

        if start == EVENT_START {
            return Self::decode_event(&bytes[2..end]);
        }

        match source {
            Source::Portal => {
                if len < PORTAL_HEADER_LEN - 2 {
                    return Err(Error::MalformedFrame("empty reply".into()));
                }
                Ok(Self {
                    kind: MessageKind::Normal,
                    command: None,
                    id: bytes[2],
                    payload: bytes[PORTAL_HEADER_LEN..end].to_vec(),
                })
            }
            Source::Host => {
                if len < HOST_HEADER_LEN - 2 {
                    return Err(Error::MalformedFrame("command frame without id".into()));
                }
                let command =
                    CommandKind::from_code(bytes[2]).ok_or(Error::UnknownCommand(bytes[2]))?;
                Ok(Self {
                    kind: MessageKind::Normal,
                    command: Some(command),
                    id: bytes[3],
                    payload: bytes[HOST_HEADER_LEN..end].to_vec(),
                })
            }
        }
    }

    fn decode_event(payload: &[u8]) -> Result<Self> {
        if payload.len() != EVENT_PAYLOAD_LEN {
            return Err(Error::MalformedFrame(format!(
                "event payload must be {} bytes, got {}",
                EVENT_PAYLOAD_LEN,
                payload.len()
            )));
        }
        match Pad::from_u8(payload[0]) {
            Some(pad) if pad.is_physical() => {}
            _ => {
                return Err(Error::MalformedFrame(format!(
                    "event for invalid pad {}",
                    payload[0]
                )));
            }
        }
        Ok(Self {
            kind: MessageKind::Event,
            command: None,
            id: NO_MESSAGE_ID,
            payload: payload.to_vec(),
        })
    }
}
