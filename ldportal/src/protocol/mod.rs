// ldportal/src/protocol/mod.rs
//! Wire protocol: 32-byte frames, commands, replies and events.

pub mod checksum;
pub mod codec;
pub mod commands;
pub mod event;
pub mod frame;
pub mod parser;
pub mod responses;

pub use checksum::checksum;
pub use commands::{Command, CommandKind};
pub use event::{Direction, TagPresence};
pub use frame::{Frame, Message, MessageKind, Source};
pub use responses::{Reply, TagListEntry};
