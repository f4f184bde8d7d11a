// ldportal/src/transport/usb/mod.rs
//! USB interrupt transport over `rusb`.

use std::sync::{Mutex, RwLock};
use std::time::Duration;

use log::{debug, warn};
use rusb::{Context, Device, DeviceHandle, TransferType};

use crate::constants::FRAME_SIZE;
use crate::protocol::Frame;
use crate::transport::traits::Transport;
use crate::{Error, Result};

mod context;
mod descriptor;

pub use context::UsbSession;
pub use descriptor::{find_endpoints, Endpoints};

/// Toy pad over libusb. One IN and one OUT endpoint, 32-byte frames.
pub struct UsbTransport {
    // None once closed
    handle: RwLock<Option<DeviceHandle<Context>>>,
    write_lock: Mutex<()>,
    endpoints: Endpoints,
    io_timeout: Duration,
}

impl UsbTransport {
    /// Open the `index`-th attached device matching vendor/product id.
    pub fn open(
        session: &UsbSession,
        vendor_id: u16,
        product_id: u16,
        index: usize,
        io_timeout: Duration,
    ) -> Result<Self> {
        let devices = session.devices_matching(vendor_id, product_id)?;
        let device = devices.get(index).ok_or(Error::DeviceNotFound)?;
        Self::open_device(device, io_timeout)
    }

    /// Claim the portal interface of `device` and flush one stale frame.
    pub fn open_device(device: &Device<Context>, io_timeout: Duration) -> Result<Self> {
        let handle = device.open()?;

        // Windows では WinUSB がドライバなので detach 不要
        #[cfg(not(target_os = "windows"))]
        {
            if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
                debug!("auto detach not supported: {}", e);
            }
        }

        let endpoints = find_endpoints(device);
        handle.claim_interface(endpoints.interface)?;
        debug!(
            "claimed interface {} (in={:#04x} out={:#04x})",
            endpoints.interface, endpoints.in_ep, endpoints.out_ep
        );

        let transport = Self {
            handle: RwLock::new(Some(handle)),
            write_lock: Mutex::new(()),
            endpoints,
            io_timeout,
        };

        // The pad may still hold a frame from a previous session
        match transport.read_frame(io_timeout) {
            Ok(Some(frame)) => debug!("discarded stale frame {:?}", frame),
            Ok(None) => {}
            Err(e) => debug!("initial flush read failed: {}", e),
        }

        Ok(transport)
    }

    /// Endpoints in use.
    pub fn endpoints(&self) -> Endpoints {
        self.endpoints
    }

    fn closed() -> Error {
        Error::TransportIo("usb transport closed".into())
    }
}

impl Transport for UsbTransport {
    fn write_frame(&self, frame: &Frame) -> Result<()> {
        let _serial = self.write_lock.lock().map_err(|_| Self::closed())?;
        let guard = self.handle.read().map_err(|_| Self::closed())?;
        let handle = guard.as_ref().ok_or_else(Self::closed)?;

        let ep = self.endpoints.out_ep;
        let bytes = frame.as_bytes();
        let mut attempt = 0;
        loop {
            let res = match self.endpoints.out_type {
                TransferType::Interrupt => handle.write_interrupt(ep, bytes, self.io_timeout),
                _ => handle.write_bulk(ep, bytes, self.io_timeout),
            };
            match res {
                Ok(n) if n == FRAME_SIZE => return Ok(()),
                Ok(n) => return Err(Error::TransportIo(format!("short write: {} bytes", n))),
                // Stalled endpoint: clear once and retry
                Err(rusb::Error::Pipe) if attempt == 0 => {
                    warn!("OUT endpoint {:#04x} stalled, clearing halt", ep);
                    let _ = handle.clear_halt(ep);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn read_frame(&self, timeout: Duration) -> Result<Option<Frame>> {
        let guard = self.handle.read().map_err(|_| Self::closed())?;
        let handle = guard.as_ref().ok_or_else(Self::closed)?;

        let ep = self.endpoints.in_ep;
        let mut buf = [0u8; FRAME_SIZE];
        let res = match self.endpoints.in_type {
            TransferType::Interrupt => handle.read_interrupt(ep, &mut buf, timeout),
            _ => handle.read_bulk(ep, &mut buf, timeout),
        };
        match res {
            Ok(0) | Err(rusb::Error::Timeout) => Ok(None),
            Ok(n) if n == FRAME_SIZE => Frame::from_bytes(&buf).map(Some),
            Ok(n) => Err(Error::MalformedFrame(format!("short read: {} bytes", n))),
            Err(rusb::Error::Pipe) => {
                warn!("IN endpoint {:#04x} stalled, clearing halt", ep);
                let _ = handle.clear_halt(ep);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.handle.write().map_err(|_| Self::closed())?;
        if let Some(handle) = guard.take() {
            if let Err(e) = handle.release_interface(self.endpoints.interface) {
                debug!("release_interface failed: {}", e);
            }
            debug!("usb transport closed");
        }
        Ok(())
    }
}

impl Drop for UsbTransport {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
