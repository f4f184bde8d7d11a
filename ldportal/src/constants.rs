// ldportal/src/constants.rs
//! Common protocol constants used across the crate

/// USB vendor id of the LEGO Dimensions toy pad
pub const PORTAL_VENDOR_ID: u16 = 0x0E6F;

/// USB product id of the LEGO Dimensions toy pad
pub const PORTAL_PRODUCT_ID: u16 = 0x0241;

/// Every frame on the wire is exactly this many bytes
pub const FRAME_SIZE: usize = 32;

/// Start marker of command/response frames
pub const FRAME_START: u8 = 0x55;

/// Start marker of unsolicited tag events
pub const EVENT_START: u8 = 0x56;

/// Bytes before the payload of a host frame: start, len, command, id
pub const HOST_HEADER_LEN: usize = 4;

/// Bytes before the payload of a portal response: start, len, id
pub const PORTAL_HEADER_LEN: usize = 3;

/// Largest payload a host frame can carry (one byte is the checksum)
pub const MAX_HOST_PAYLOAD: usize = FRAME_SIZE - HOST_HEADER_LEN - 1;

/// Largest value of the length byte (start + len + checksum = 3 fixed bytes)
pub const MAX_LEN_FIELD: usize = FRAME_SIZE - 3;

/// Event payload: pad, tag type, index, direction, uid(7)
pub const EVENT_PAYLOAD_LEN: usize = 11;

/// Tag UID length (NTAG21x)
pub const UID_LEN: usize = 7;

/// Message id 0 is never assigned to a command
pub const NO_MESSAGE_ID: u8 = 0;

/// Wake payload expected by the portal firmware
pub const WAKE_GREETING: &[u8] = b"(c) LEGO 2014";

/// Serial number starts at this offset of the wake reply
pub const WAKE_SERIAL_OFFSET: usize = 10;

/// First page of the obfuscated identity block (0x24..=0x25)
pub const IDENTITY_PAGE: u8 = 0x24;

/// Page carrying the vehicle/character discriminator
pub const MARKER_PAGE: u8 = 0x26;

/// NTAG213 PWD page
pub const PASSWORD_PAGE: u8 = 0x2B;

/// Marker stored at page 0x26 by vehicle tags
pub const VEHICLE_MARKER: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// Size of a tag page read (four 4-byte pages)
pub const READ_BLOCK_LEN: usize = 16;

/// Size of a tag page write
pub const WRITE_PAGE_LEN: usize = 4;
