// ldportal/src/prelude.rs
//! Commonly used types, for glob import.

pub use crate::catalog::{Catalog, CatalogEntry, EmptyCatalog, Rebuild, StaticCatalog};
pub use crate::portal::{
    PadTag, PendingCommand, Portal, PortalBuilder, PortalConfig, PresentTag, TagEvent,
};
pub use crate::protocol::{Command, CommandKind, Frame, Message, MessageKind, Reply};
pub use crate::tag::TagIdentity;
pub use crate::transport::{MockTransport, Transport};
pub use crate::{
    Color, Error, FadePad, FlashPad, Pad, PasswordPolicy, Result, TagType, Uid,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, default_receive_timeout, ms, parse_hex};
