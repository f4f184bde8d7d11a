// ldportal/src/portal/config.rs
//! Portal configuration.

use std::time::Duration;

use crate::constants::{PORTAL_PRODUCT_ID, PORTAL_VENDOR_ID};
use crate::utils::{default_io_timeout, default_receive_timeout, STALE_READ_FACTOR};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Portal settings. `Default` matches the retail toy pad.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PortalConfig {
    /// USB vendor id to match
    pub vendor_id: u16,
    /// USB product id to match
    pub product_id: u16,
    /// Which of the matching devices to open
    pub device_index: usize,
    /// Bound on one USB transfer
    pub io_timeout: Duration,
    /// Bound on waiting for a reply
    pub receive_timeout: Duration,
    /// Read the identity pages of newly placed tags
    pub fetch_tag_details: bool,
    /// Background identity reads still unanswered after this are dropped
    pub stale_read_expiry: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        let receive_timeout = default_receive_timeout();
        Self {
            vendor_id: PORTAL_VENDOR_ID,
            product_id: PORTAL_PRODUCT_ID,
            device_index: 0,
            io_timeout: default_io_timeout(),
            receive_timeout,
            fetch_tag_details: true,
            stale_read_expiry: receive_timeout * STALE_READ_FACTOR,
        }
    }
}

impl PortalConfig {
    /// Same as `Default`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a different USB vendor/product id.
    pub fn with_device(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }

    /// Open the `index`-th matching device.
    pub fn with_device_index(mut self, index: usize) -> Self {
        self.device_index = index;
        self
    }

    /// Bound on one USB transfer.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Also rescales the stale read expiry.
    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self.stale_read_expiry = timeout * STALE_READ_FACTOR;
        self
    }

    /// Read identity pages on arrival.
    pub fn with_fetch_tag_details(mut self, enabled: bool) -> Self {
        self.fetch_tag_details = enabled;
        self
    }

    /// Age at which unanswered identity reads are dropped.
    pub fn with_stale_read_expiry(mut self, expiry: Duration) -> Self {
        self.stale_read_expiry = expiry;
        self
    }
}
