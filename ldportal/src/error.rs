// ldportal/src/error.rs
//! Crate error type.

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// No toy pad with the configured ids is attached
    #[error("device not found")]
    DeviceNotFound,

    /// A USB transfer did not complete in time
    #[error("transport timed out")]
    TransportTimeout,

    /// Transport failure that is not a USB error (closed, poisoned lock, ...)
    #[error("transport i/o error: {0}")]
    TransportIo(String),

    // USB 実装は optional dependency なので feature で切り替える
    /// Any other libusb error
    #[cfg(feature = "usb")]
    #[error("usb error: {0}")]
    Usb(rusb::Error),

    /// Bad marker, length or frame size
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Frame checksum does not match its contents
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the frame
        expected: u8,
        /// Checksum byte found in the frame
        actual: u8,
    },

    /// Host payload does not fit in a frame
    #[error("payload too large: at most {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Largest payload a frame can carry
        max: usize,
        /// Payload length given
        actual: usize,
    },

    /// Byte slice shorter (or longer) than required
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Length found
        actual: usize,
    },

    /// Pad byte outside 0..=3
    #[error("invalid pad: {0}")]
    InvalidPad(u8),

    /// Command byte the protocol does not define
    #[error("unknown command code {0:#04x}")]
    UnknownCommand(u8),

    /// The portal reported a non-zero tag status
    #[error("tag authentication failed: status={status:#04x}")]
    AuthenticationFailed {
        /// Tag status byte from the reply
        status: u8,
    },

    /// A verified write never read back the written data
    #[error("page {page:#04x} did not verify after {attempts} attempts")]
    VerificationFailed {
        /// Page that was written
        page: u8,
        /// Attempts made
        attempts: usize,
    },

    /// Every message id 1..=255 is waiting for a reply
    #[error("all message ids are in flight")]
    NoFreeMessageId,
}

impl Error {
    /// True for structural frame errors. The dispatch loop drops such frames
    /// and keeps reading.
    pub fn is_malformed_frame(&self) -> bool {
        matches!(
            self,
            Error::MalformedFrame(_) | Error::ChecksumMismatch { .. } | Error::UnknownCommand(_)
        )
    }
}

#[cfg(feature = "usb")]
impl From<rusb::Error> for Error {
    fn from(e: rusb::Error) -> Self {
        match e {
            rusb::Error::Timeout => Error::TransportTimeout,
            rusb::Error::NoDevice | rusb::Error::NotFound => Error::DeviceNotFound,
            other => Error::Usb(other),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
