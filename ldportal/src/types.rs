// ldportal/src/types.rs
//! Common value types: tag UIDs, pads, colours and light effects.

use crate::Error;
use crate::constants::UID_LEN;
use std::convert::TryFrom;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag UID - Newtype Pattern (7 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Uid([u8; UID_LEN]);

impl Uid {
    /// Wrap raw UID bytes.
    pub fn from_bytes(bytes: [u8; UID_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw UID bytes.
    pub fn as_bytes(&self) -> &[u8; UID_LEN] {
        &self.0
    }

    /// Lowercase hex, no separators.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != UID_LEN {
            return Err(Error::InvalidLength {
                expected: UID_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; UID_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Physical pads of the portal. `All` only addresses lighting commands.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pad {
    /// Every pad at once
    All = 0,
    /// Large centre pad
    Center = 1,
    /// Left pad
    Left = 2,
    /// Right pad
    Right = 3,
}

impl Pad {
    /// Pad for a wire byte; `None` outside 0..=3.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::All),
            1 => Some(Self::Center),
            2 => Some(Self::Left),
            3 => Some(Self::Right),
            _ => None,
        }
    }

    /// True for the three pads a tag can sit on.
    pub fn is_physical(&self) -> bool {
        !matches!(self, Self::All)
    }

    /// Wire byte.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Pad {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(Error::InvalidPad(value))
    }
}

/// TagType (u8) as reported by the portal in events and tag lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TagType(u8);

impl TagType {
    /// NTAG213 toy tag, the only tag family the portal ships with
    pub const NTAG213: Self = Self(0x00);

    /// Wrap a raw tag type byte.
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Raw tag type byte.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

/// RGB colour sent to the pads. Alpha is ignored by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Off
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Full white
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Full red
    pub const RED: Self = Self::rgb(0xff, 0, 0);
    /// Web green (0x008000)
    pub const GREEN: Self = Self::rgb(0, 0x80, 0);
    /// Full blue
    pub const BLUE: Self = Self::rgb(0, 0, 0xff);

    /// Colour from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a 32-bit ARGB value, dropping alpha.
    pub const fn from_argb(argb: u32) -> Self {
        Self::rgb((argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
    }

    /// Opaque 32-bit ARGB value.
    pub const fn to_argb(&self) -> u32 {
        0xff00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// `[r, g, b]` as sent on the wire.
    pub fn to_bytes(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Per-pad flash pattern. Ticks are in portal units (about 1/20 s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlashPad {
    /// `false` leaves the pad as it is
    pub enabled: bool,
    /// Ticks with the colour on
    pub tick_on: u8,
    /// Ticks with the colour off
    pub tick_off: u8,
    /// Number of on/off cycles; 0xff flashes forever
    pub tick_count: u8,
    /// Flash colour
    pub color: Color,
}

impl FlashPad {
    /// Enabled flash pattern.
    pub fn new(tick_on: u8, tick_off: u8, tick_count: u8, color: Color) -> Self {
        Self {
            enabled: true,
            tick_on,
            tick_off,
            tick_count,
            color,
        }
    }

    /// Leave the pad untouched in `flash_all`.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            tick_on: 0,
            tick_off: 0,
            tick_count: 0,
            color: Color::BLACK,
        }
    }
}

/// Per-pad fade pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FadePad {
    /// `false` leaves the pad as it is
    pub enabled: bool,
    /// Ticks per fade step
    pub tick_time: u8,
    /// Number of fades
    pub tick_count: u8,
    /// Target colour
    pub color: Color,
}

impl FadePad {
    /// Enabled fade pattern.
    pub fn new(tick_time: u8, tick_count: u8, color: Color) -> Self {
        Self {
            enabled: true,
            tick_time,
            tick_count,
            color,
        }
    }

    /// Leave the pad untouched in `fade_all`.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            tick_time: 0,
            tick_count: 0,
            color: Color::BLACK,
        }
    }
}

/// How the portal authenticates against a tag before read/write.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PasswordPolicy {
    /// No authentication
    Disable = 0,
    /// Portal derives the password from the UID (firmware default)
    #[default]
    Automatic = 1,
    /// Password supplied by the host
    Custom = 2,
}
