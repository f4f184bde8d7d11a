//! Timeout defaults.
//!
//! The I/O timeout bounds a single USB transfer and is what keeps the
//! dispatch loop responsive to shutdown. The receive timeout bounds how
//! long a caller waits for the portal's reply and must be longer.

use std::time::Duration;

/// Single USB read/write
pub const DEFAULT_IO_TIMEOUT_MS: u64 = 1000;

/// Caller waiting for a reply
pub const DEFAULT_RECEIVE_TIMEOUT_MS: u64 = 2000;

/// Background identity reads older than this many receive timeouts are dropped
pub const STALE_READ_FACTOR: u32 = 4;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Default bound on one USB transfer.
pub fn default_io_timeout() -> Duration {
    ms(DEFAULT_IO_TIMEOUT_MS)
}

/// Default bound on waiting for a reply.
pub fn default_receive_timeout() -> Duration {
    ms(DEFAULT_RECEIVE_TIMEOUT_MS)
}
