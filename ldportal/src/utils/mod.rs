//! Small helpers shared across the crate: hex formatting for the frame
//! logs and the timeout defaults.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
