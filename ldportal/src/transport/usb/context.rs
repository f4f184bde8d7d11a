// ldportal/src/transport/usb/context.rs
//! libusb context ownership.

use std::sync::OnceLock;

use rusb::{Context, Device, UsbContext};

use crate::constants::{PORTAL_PRODUCT_ID, PORTAL_VENDOR_ID};
use crate::Result;

static GLOBAL: OnceLock<UsbSession> = OnceLock::new();

/// Owner of the libusb context. Devices opened from a session keep a
/// reference to its context, so a session outlives every transport built
/// from it.
#[derive(Debug)]
pub struct UsbSession {
    context: Context,
}

impl UsbSession {
    /// Session with its own libusb context.
    pub fn new() -> Result<Self> {
        let context = Context::new()?;
        Ok(Self { context })
    }

    /// Process-wide session, created on first use and kept until exit.
    pub fn global() -> Result<&'static UsbSession> {
        if let Some(session) = GLOBAL.get() {
            return Ok(session);
        }
        let session = Self::new()?;
        Ok(GLOBAL.get_or_init(|| session))
    }

    /// Underlying libusb context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Attached toy pads.
    pub fn portals(&self) -> Result<Vec<Device<Context>>> {
        self.devices_matching(PORTAL_VENDOR_ID, PORTAL_PRODUCT_ID)
    }

    /// Attached devices with the given vendor/product id.
    pub fn devices_matching(&self, vendor_id: u16, product_id: u16) -> Result<Vec<Device<Context>>> {
        let mut found = Vec::new();
        for device in self.context.devices()?.iter() {
            let dd = match device.device_descriptor() {
                Ok(dd) => dd,
                Err(e) => {
                    log::debug!("skipping device without descriptor: {}", e);
                    continue;
                }
            };
            if dd.vendor_id() == vendor_id && dd.product_id() == product_id {
                found.push(device);
            }
        }
        Ok(found)
    }
}
