// ldportal/src/lib.rs

//! ldportal
//!
//! Pure Rust driver for the LEGO Dimensions USB toy pad: frame codec, tag
//! identity codec, and a threaded portal handle that tracks tags and lights.
//!
//! ```no_run
//! # #[cfg(feature = "usb")]
//! # fn main() -> ldportal::Result<()> {
//! use ldportal::prelude::*;
//!
//! let portal = Portal::open()?;
//! portal.set_color(Pad::Center, Color::BLUE)?;
//! for event in portal.subscribe() {
//!     println!("{:?} present={} {:?}", event.pad, event.present, event.identity);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "usb"))]
//! # fn main() {}
//! ```
#![warn(missing_docs)]

pub mod catalog;
pub mod constants;
pub mod error;
pub mod portal;
pub mod prelude;
pub mod protocol;
pub mod tag;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// `crate::Error`, `crate::Result` and the value types live at the root too.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
