// ldportal/src/protocol/commands/mod.rs
//! Command codes and the host command set.

pub mod light;
pub mod system;
pub mod tag;

pub use light::{
    encode_color, encode_color_all, encode_fade, encode_fade_all, encode_fade_random,
    encode_flash, encode_flash_all, encode_get_color,
};
pub use system::{encode_config_active, encode_wake};
pub use tag::{encode_config_password, encode_model, encode_read, encode_write};

use crate::constants::WRITE_PAGE_LEN;
use crate::protocol::frame::Frame;
use crate::types::{Color, FadePad, FlashPad, Pad, PasswordPolicy};
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Command byte of a host frame.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CommandKind {
    /// Wake greeting; answered with the serial number
    Wake = 0xB0,
    /// Random challenge bytes
    Challenge = 0xB3,
    /// Set one pad (or all) to a colour
    Color = 0xC0,
    /// Current colour of a pad
    GetColor = 0xC1,
    /// Fade one pad
    Fade = 0xC2,
    /// Flash one pad
    Flash = 0xC3,
    /// Fade one pad through random colours
    FadeRandom = 0xC4,
    /// Fade each pad with its own pattern
    FadeAll = 0xC6,
    /// Flash each pad with its own pattern
    FlashAll = 0xC7,
    /// Set each pad to its own colour
    ColorAll = 0xC8,
    /// Tags currently on the pads
    TagList = 0xD0,
    /// Read four pages of a tag
    Read = 0xD2,
    /// Write one page of a tag
    Write = 0xD3,
    /// Decrypt an identity block with the portal key
    Model = 0xD4,
    /// Tag password policy
    ConfigPassword = 0xE1,
    /// Enable or disable tag detection
    ConfigActive = 0xE5,
}

impl CommandKind {
    /// Command byte.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Kind for a command byte; `None` if undefined.
    pub fn from_code(code: u8) -> Option<Self> {
        let kind = match code {
            0xB0 => Self::Wake,
            0xB3 => Self::Challenge,
            0xC0 => Self::Color,
            0xC1 => Self::GetColor,
            0xC2 => Self::Fade,
            0xC3 => Self::Flash,
            0xC4 => Self::FadeRandom,
            0xC6 => Self::FadeAll,
            0xC7 => Self::FlashAll,
            0xC8 => Self::ColorAll,
            0xD0 => Self::TagList,
            0xD2 => Self::Read,
            0xD3 => Self::Write,
            0xD4 => Self::Model,
            0xE1 => Self::ConfigPassword,
            0xE5 => Self::ConfigActive,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether the portal sends a reply payload the caller cares about.
    /// Lighting and configuration commands are only acknowledged.
    pub fn expects_reply(self) -> bool {
        matches!(
            self,
            Self::Wake
                | Self::Challenge
                | Self::GetColor
                | Self::TagList
                | Self::Read
                | Self::Write
                | Self::Model
        )
    }
}

/// High-level command set. Per-command payload encoders live in
/// `protocol::commands::{light,tag,system}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Wake the portal
    Wake,
    /// Ask for challenge bytes
    Challenge,
    /// Set `pad` to `color`
    Color {
        /// Target pad; `Pad::All` for every pad
        pad: Pad,
        /// New colour
        color: Color,
    },
    /// Query the colour of `pad`
    GetColor {
        /// Pad to query
        pad: Pad,
    },
    /// center, left, right
    ColorAll([Option<Color>; 3]),
    /// Flash one pad
    Flash {
        /// Target pad
        pad: Pad,
        /// Flash pattern
        flash: FlashPad,
    },
    /// Flash pattern per pad (center, left, right)
    FlashAll([FlashPad; 3]),
    /// Fade one pad
    Fade {
        /// Target pad
        pad: Pad,
        /// Fade pattern
        fade: FadePad,
    },
    /// Fade pattern per pad (center, left, right)
    FadeAll([FadePad; 3]),
    /// Fade one pad through random colours
    FadeRandom {
        /// Target pad
        pad: Pad,
        /// Ticks per step
        tick_time: u8,
        /// Number of steps
        tick_count: u8,
    },
    /// List the tags on the pads
    TagList,
    /// Read four pages starting at `page`
    Read {
        /// Tag slot index from the arrival event
        index: u8,
        /// First page
        page: u8,
    },
    /// Write one page
    Write {
        /// Tag slot index
        index: u8,
        /// Page to write
        page: u8,
        /// Page contents
        data: [u8; WRITE_PAGE_LEN],
    },
    /// Decrypt an 8-byte identity block
    Model {
        /// Encrypted block
        data: [u8; 8],
    },
    /// Choose how the portal authenticates against a tag
    ConfigPassword {
        /// Password policy
        policy: PasswordPolicy,
        /// Tag slot index
        index: u8,
        /// Only used with `PasswordPolicy::Custom`
        password: [u8; 4],
    },
    /// Tag detection on/off
    ConfigActive(bool),
}

impl Command {
    /// Command byte this command is sent with.
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Wake => CommandKind::Wake,
            Self::Challenge => CommandKind::Challenge,
            Self::Color { .. } => CommandKind::Color,
            Self::GetColor { .. } => CommandKind::GetColor,
            Self::ColorAll(_) => CommandKind::ColorAll,
            Self::Flash { .. } => CommandKind::Flash,
            Self::FlashAll(_) => CommandKind::FlashAll,
            Self::Fade { .. } => CommandKind::Fade,
            Self::FadeAll(_) => CommandKind::FadeAll,
            Self::FadeRandom { .. } => CommandKind::FadeRandom,
            Self::TagList => CommandKind::TagList,
            Self::Read { .. } => CommandKind::Read,
            Self::Write { .. } => CommandKind::Write,
            Self::Model { .. } => CommandKind::Model,
            Self::ConfigPassword { .. } => CommandKind::ConfigPassword,
            Self::ConfigActive(_) => CommandKind::ConfigActive,
        }
    }

    /// Encode the command parameters (without the frame header).
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Self::Wake => encode_wake(),
            Self::Challenge | Self::TagList => Vec::new(),
            Self::Color { pad, color } => encode_color(*pad, *color),
            Self::GetColor { pad } => encode_get_color(*pad),
            Self::ColorAll(colors) => encode_color_all(colors),
            Self::Flash { pad, flash } => encode_flash(*pad, flash),
            Self::FlashAll(pads) => encode_flash_all(pads),
            Self::Fade { pad, fade } => encode_fade(*pad, fade),
            Self::FadeAll(pads) => encode_fade_all(pads),
            Self::FadeRandom {
                pad,
                tick_time,
                tick_count,
            } => encode_fade_random(*pad, *tick_time, *tick_count),
            Self::Read { index, page } => encode_read(*index, *page),
            Self::Write { index, page, data } => encode_write(*index, *page, data),
            Self::Model { data } => encode_model(data),
            Self::ConfigPassword {
                policy,
                index,
                password,
            } => encode_config_password(*policy, *index, password),
            Self::ConfigActive(enabled) => encode_config_active(*enabled),
        }
    }

    /// Encode into a full frame carrying `id`.
    pub fn to_frame(&self, id: u8) -> Result<Frame> {
        Frame::encode(self.kind(), id, &self.payload())
    }
}
