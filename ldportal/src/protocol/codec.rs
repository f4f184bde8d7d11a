// ldportal/src/protocol/codec.rs
//! Frame-level helpers over the command and reply types.

use crate::Result;

use super::commands::{Command, CommandKind};
use super::frame::{Frame, Message, Source};
use super::responses::Reply;

/// Encode a Command into a full 32-byte wire frame carrying `id`.
pub fn encode_command_frame(cmd: &Command, id: u8) -> Result<Frame> {
    cmd.to_frame(id)
}

/// Decode a frame read from the portal.
pub fn decode_portal_frame(bytes: &[u8]) -> Result<Message> {
    Message::decode(bytes, Source::Portal)
}

/// Decode a portal reply frame and interpret its payload as the reply to
/// `expected`.
pub fn decode_reply_frame(expected: CommandKind, bytes: &[u8]) -> Result<(u8, Reply)> {
    let msg = decode_portal_frame(bytes)?;
    if msg.is_event() {
        return Err(crate::Error::MalformedFrame(
            "expected a reply, got an event".into(),
        ));
    }
    let reply = Reply::decode(expected, msg.payload())?;
    Ok((msg.id(), reply))
}
