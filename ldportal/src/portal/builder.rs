// ldportal/src/portal/builder.rs
//! Portal builder.

use std::sync::Arc;

use crate::catalog::{Catalog, EmptyCatalog};
use crate::portal::config::PortalConfig;
use crate::portal::Portal;
use crate::transport::Transport;
#[cfg(not(feature = "usb"))]
use crate::Error;
use crate::Result;

/// Helper to construct a Portal with optional configuration.
pub struct PortalBuilder {
    transport: Option<Box<dyn Transport>>,
    config: PortalConfig,
    catalog: Arc<dyn Catalog>,
}

impl Default for PortalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalBuilder {
    /// Builder with default config and an empty catalog.
    pub fn new() -> Self {
        Self {
            transport: None,
            config: PortalConfig::default(),
            catalog: Arc::new(EmptyCatalog),
        }
    }

    /// Provide an already-created transport instance (e.g. MockTransport)
    pub fn transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the config.
    pub fn config(mut self, config: PortalConfig) -> Self {
        self.config = config;
        self
    }

    /// Catalog used to name identified tags in events.
    pub fn catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Start the portal. Without an explicit transport the USB device named
    /// by the config is opened (`usb` feature); otherwise `DeviceNotFound`.
    pub fn build(self) -> Result<Portal> {
        let transport = match self.transport {
            Some(t) => t,
            None => Self::open_default(&self.config)?,
        };
        Portal::start(transport, self.config, self.catalog)
    }

    #[cfg(feature = "usb")]
    fn open_default(config: &PortalConfig) -> Result<Box<dyn Transport>> {
        use crate::transport::{UsbSession, UsbTransport};

        let session = UsbSession::global()?;
        let usb = UsbTransport::open(
            session,
            config.vendor_id,
            config.product_id,
            config.device_index,
            config.io_timeout,
        )?;
        Ok(Box::new(usb))
    }

    #[cfg(not(feature = "usb"))]
    fn open_default(_config: &PortalConfig) -> Result<Box<dyn Transport>> {
        Err(Error::DeviceNotFound)
    }
}
