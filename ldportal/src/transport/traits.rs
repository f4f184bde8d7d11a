// ldportal/src/transport/traits.rs
//! Transport abstraction the portal reads and writes frames through.

use std::time::Duration;

use crate::protocol::Frame;
use crate::Result;

/// Transport trait abstracts the endpoint pair away from the portal logic.
///
/// Methods take `&self`: the dispatch thread reads while caller threads
/// write, so implementations serialize internally.
pub trait Transport: Send + Sync {
    /// Write one 32-byte frame.
    fn write_frame(&self, frame: &Frame) -> Result<()>;

    /// Read one 32-byte frame. `Ok(None)` when nothing arrived within
    /// `timeout`.
    fn read_frame(&self, timeout: Duration) -> Result<Option<Frame>>;

    /// Release the device. Calling it twice is a no-op.
    fn close(&self) -> Result<()>;
}
