// ldportal/src/portal/mod.rs
//! Portal handle: owns the transport, the reader thread and the
//! id → pending command table.
//!
//! Commands are written from the calling thread; replies and tag events are
//! read on a dedicated thread that resolves pending commands and publishes
//! [`TagEvent`]s. Operations that wait for a reply fall back to a default
//! value (black, empty bytes, `false`) once the receive timeout elapses.

pub mod builder;
pub mod config;
mod dispatch;
pub mod events;
pub mod pending;
pub mod presence;

pub use builder::PortalBuilder;
pub use config::PortalConfig;
pub use events::{EventHub, TagEvent};
pub use pending::{PendingCommand, PendingTable};
pub use presence::{PadTag, PresenceTracker, PresentTag, Transition};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::catalog::Catalog;
use crate::constants::{READ_BLOCK_LEN, WRITE_PAGE_LEN};
use crate::protocol::{Command, Reply};
use crate::tag::{character_pages, vehicle_pages};
use crate::transport::Transport;
use crate::types::{Color, FadePad, FlashPad, Pad, PasswordPolicy, Uid};
use crate::{Error, Result};

use dispatch::Shared;
use pending::Waiter;

/// Attempts used by `program_vehicle` / `program_character`
pub const PROGRAM_ATTEMPTS: usize = 3;

/// A started toy pad.
pub struct Portal {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
    serial: Mutex<Vec<u8>>,
    nfc_enabled: AtomicBool,
}

impl Portal {
    /// Open the first toy pad attached over USB.
    #[cfg(feature = "usb")]
    pub fn open() -> Result<Self> {
        Self::open_with(PortalConfig::default())
    }

    /// Open a toy pad over USB with `config`.
    #[cfg(feature = "usb")]
    pub fn open_with(config: PortalConfig) -> Result<Self> {
        PortalBuilder::new().config(config).build()
    }

    /// Start on an existing transport, e.g. a `MockTransport`.
    pub fn with_transport(transport: Box<dyn Transport>, config: PortalConfig) -> Result<Self> {
        PortalBuilder::new()
            .transport(transport)
            .config(config)
            .build()
    }

    /// Builder for a custom transport or catalog.
    pub fn builder() -> PortalBuilder {
        PortalBuilder::new()
    }

    pub(crate) fn start(
        transport: Box<dyn Transport>,
        config: PortalConfig,
        catalog: Arc<dyn Catalog>,
    ) -> Result<Self> {
        let shared = Arc::new(Shared::new(transport, config, catalog));
        let worker = {
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name("ldportal-dispatch".into())
                .spawn(move || dispatch::run(shared))
                .map_err(|e| Error::TransportIo(format!("cannot spawn reader: {}", e)))?
        };
        let portal = Self {
            shared,
            worker: Some(worker),
            serial: Mutex::new(Vec::new()),
            nfc_enabled: AtomicBool::new(true),
        };

        let serial = portal.wake()?;
        if serial.is_empty() {
            warn!("portal did not answer wake");
        } else {
            info!("portal ready, serial {}", crate::utils::bytes_to_hex(&serial));
        }
        Ok(portal)
    }

    /// Settings the portal was started with.
    pub fn config(&self) -> &PortalConfig {
        &self.shared.config
    }

    // ---- correlation primitives ----

    /// Write `cmd` without waiting. Returns the message id used.
    pub fn send(&self, cmd: &Command) -> Result<u8> {
        self.shared
            .send_command(cmd, Waiter::Discard)
            .map(|ticket| ticket.id)
    }

    /// Write `cmd` and register for its reply.
    pub fn issue(&self, cmd: &Command) -> Result<PendingCommand> {
        let (tx, rx) = mpsc::sync_channel(1);
        let ticket = self.shared.send_command(cmd, Waiter::Caller(tx))?;
        Ok(PendingCommand::new(
            ticket,
            cmd.kind(),
            rx,
            Arc::clone(&self.shared.pending),
        ))
    }

    /// Block until `pending` resolves. `None` on timeout; the entry is gone
    /// either way.
    pub fn await_result(&self, pending: PendingCommand, timeout: Duration) -> Option<Reply> {
        pending.wait(timeout)
    }

    fn request(&self, cmd: &Command) -> Result<Option<Reply>> {
        let pending = self.issue(cmd)?;
        Ok(self.await_result(pending, self.shared.config.receive_timeout))
    }

    /// Number of commands still waiting for a reply.
    pub fn in_flight(&self) -> usize {
        self.shared.pending.len()
    }

    // ---- system ----

    /// Send the wake greeting and return the serial number. Restarts the
    /// message id sequence. Empty on timeout.
    pub fn wake(&self) -> Result<Vec<u8>> {
        self.shared.pending.reset_sequence();
        let serial = match self.request(&Command::Wake)? {
            Some(Reply::Serial(serial)) => serial,
            _ => Vec::new(),
        };
        *self.serial.lock().unwrap_or_else(|p| p.into_inner()) = serial.clone();
        Ok(serial)
    }

    /// Serial number from the last successful wake.
    pub fn serial_number(&self) -> Vec<u8> {
        self.serial.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Challenge bytes from the portal. Empty on timeout.
    pub fn challenge(&self) -> Result<Vec<u8>> {
        match self.request(&Command::Challenge)? {
            Some(Reply::Challenge(data)) => Ok(data),
            _ => Ok(Vec::new()),
        }
    }

    /// Last tag detection state set on the portal.
    pub fn nfc_enabled(&self) -> bool {
        self.nfc_enabled.load(Ordering::Acquire)
    }

    /// Turn tag detection on or off.
    pub fn set_nfc_enabled(&self, enabled: bool) -> Result<()> {
        self.send(&Command::ConfigActive(enabled))?;
        self.nfc_enabled.store(enabled, Ordering::Release);
        Ok(())
    }

    /// Whether arrivals trigger an identity read.
    pub fn fetch_tag_details(&self) -> bool {
        self.shared.fetch_details.load(Ordering::Acquire)
    }

    /// Whether newly placed tags get their identity pages read before the
    /// arrival is published.
    pub fn set_fetch_tag_details(&self, enabled: bool) {
        self.shared.fetch_details.store(enabled, Ordering::Release);
    }

    // ---- lights ----

    /// Set `pad` to `color`. `Pad::All` sets every pad.
    pub fn set_color(&self, pad: Pad, color: Color) -> Result<()> {
        self.send(&Command::Color { pad, color }).map(drop)
    }

    /// Current colour of `pad`; black on timeout.
    pub fn get_color(&self, pad: Pad) -> Result<Color> {
        match self.request(&Command::GetColor { pad })? {
            Some(Reply::Color(color)) => Ok(color),
            _ => Ok(Color::BLACK),
        }
    }

    /// Colour per pad (centre, left, right); `None` leaves a pad unchanged.
    pub fn set_color_all(&self, colors: [Option<Color>; 3]) -> Result<()> {
        self.send(&Command::ColorAll(colors)).map(drop)
    }

    /// Turn every pad black.
    pub fn switch_off_all(&self) -> Result<()> {
        self.set_color_all([Some(Color::BLACK); 3])
    }

    /// Flash `pad` with the given pattern.
    pub fn flash(&self, pad: Pad, flash: FlashPad) -> Result<()> {
        self.send(&Command::Flash { pad, flash }).map(drop)
    }

    /// Flash pattern per pad (centre, left, right).
    pub fn flash_all(&self, pads: [FlashPad; 3]) -> Result<()> {
        self.send(&Command::FlashAll(pads)).map(drop)
    }

    /// Fade `pad` towards the pattern colour.
    pub fn fade(&self, pad: Pad, fade: FadePad) -> Result<()> {
        self.send(&Command::Fade { pad, fade }).map(drop)
    }

    /// Fade pattern per pad (centre, left, right).
    pub fn fade_all(&self, pads: [FadePad; 3]) -> Result<()> {
        self.send(&Command::FadeAll(pads)).map(drop)
    }

    /// Fade `pad` through `tick_count` random colours.
    pub fn fade_random(&self, pad: Pad, tick_time: u8, tick_count: u8) -> Result<()> {
        self.send(&Command::FadeRandom {
            pad,
            tick_time,
            tick_count,
        })
        .map(drop)
    }

    // ---- tags ----

    /// Read four pages starting at `page`. Empty on timeout or tag error.
    pub fn read_tag(&self, index: u8, page: u8) -> Result<Vec<u8>> {
        match self.try_read_tag(index, page) {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Ok(Vec::new()),
            Err(Error::AuthenticationFailed { status }) => {
                debug!("read of tag {} page {:#04x}: status {:#04x}", index, page, status);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Like `read_tag` but distinguishes a tag error from a timeout.
    pub fn try_read_tag(&self, index: u8, page: u8) -> Result<Option<Vec<u8>>> {
        match self.request(&Command::Read { index, page })? {
            Some(Reply::Page { status: 0, data }) if data.len() >= READ_BLOCK_LEN => Ok(Some(data)),
            Some(Reply::Page { status: 0, data }) => Err(Error::InvalidLength {
                expected: READ_BLOCK_LEN,
                actual: data.len(),
            }),
            Some(Reply::Page { status, .. }) => Err(Error::AuthenticationFailed { status }),
            _ => Ok(None),
        }
    }

    /// Write one page. `false` on timeout or tag error.
    pub fn write_tag(&self, index: u8, page: u8, data: [u8; WRITE_PAGE_LEN]) -> Result<bool> {
        match self.try_write_tag(index, page, data) {
            Ok(written) => Ok(written.is_some()),
            Err(Error::AuthenticationFailed { status }) => {
                debug!("write of tag {} page {:#04x}: status {:#04x}", index, page, status);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Like `write_tag` but distinguishes a tag error from a timeout.
    pub fn try_write_tag(
        &self,
        index: u8,
        page: u8,
        data: [u8; WRITE_PAGE_LEN],
    ) -> Result<Option<()>> {
        match self.request(&Command::Write { index, page, data })? {
            Some(Reply::Written { status: 0 }) => Ok(Some(())),
            Some(Reply::Written { status }) => Err(Error::AuthenticationFailed { status }),
            _ => Ok(None),
        }
    }

    /// Write `data`, read it back and compare. Between attempts the portal
    /// is told to authenticate with the derived password again.
    pub fn write_tag_verified(
        &self,
        index: u8,
        page: u8,
        data: [u8; WRITE_PAGE_LEN],
        attempts: usize,
    ) -> Result<()> {
        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            if attempt > 1 {
                self.set_tag_password(PasswordPolicy::Automatic, index, None)?;
            }
            if !self.write_tag(index, page, data)? {
                debug!("page {:#04x} write attempt {} failed", page, attempt);
                continue;
            }
            let back = self.read_tag(index, page)?;
            if back.get(..WRITE_PAGE_LEN) == Some(&data[..]) {
                return Ok(());
            }
            debug!("page {:#04x} read back differs (attempt {})", page, attempt);
        }
        Err(Error::VerificationFailed { page, attempts })
    }

    /// Turn the tag in slot `index` into vehicle `id`.
    pub fn program_vehicle(&self, index: u8, id: u16) -> Result<()> {
        for (page, data) in vehicle_pages(id) {
            self.write_tag_verified(index, page, data, PROGRAM_ATTEMPTS)?;
        }
        Ok(())
    }

    /// Turn the tag with `uid` in slot `index` into character `id`.
    pub fn program_character(&self, index: u8, uid: &Uid, id: u16) -> Result<()> {
        for (page, data) in character_pages(uid, id) {
            self.write_tag_verified(index, page, data, PROGRAM_ATTEMPTS)?;
        }
        Ok(())
    }

    /// Ask the portal to decode an encrypted 8-byte identity block.
    /// Empty on timeout or tag error.
    pub fn tag_information(&self, data: &[u8; 8]) -> Result<Vec<u8>> {
        match self.request(&Command::Model { data: *data })? {
            Some(Reply::Model { status: 0, data }) => Ok(data),
            _ => Ok(Vec::new()),
        }
    }

    /// Choose how the portal authenticates against tag `index`. `password`
    /// is only meaningful with `PasswordPolicy::Custom`.
    pub fn set_tag_password(
        &self,
        policy: PasswordPolicy,
        index: u8,
        password: Option<[u8; 4]>,
    ) -> Result<()> {
        let password = match policy {
            PasswordPolicy::Custom => password.unwrap_or_default(),
            _ => [0; 4],
        };
        self.send(&Command::ConfigPassword {
            policy,
            index,
            password,
        })
        .map(drop)
    }

    /// Ask the portal which tags it sees and replace the present list with
    /// the answer. On timeout the current list is returned unchanged.
    pub fn list_tags(&self) -> Result<Vec<PresentTag>> {
        if self.request(&Command::TagList)?.is_none() {
            debug!("tag list timed out");
        }
        Ok(self.present_tags())
    }

    /// Tags currently on the pads, as last seen.
    pub fn present_tags(&self) -> Vec<PresentTag> {
        self.shared.presence().present()
    }

    /// Full tracked records, including resolved identities.
    pub fn pad_tags(&self) -> Vec<PadTag> {
        self.shared.presence().tags()
    }

    /// Tag arrivals and departures from now on.
    pub fn subscribe(&self) -> Receiver<TagEvent> {
        self.shared.events.subscribe()
    }

    /// Stop the reader thread and release the device.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        self.shared.stop.store(true, Ordering::Release);
        if worker.join().is_err() {
            warn!("dispatch thread panicked");
        }
        self.shared.transport.close()
    }
}

impl Drop for Portal {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("closing portal: {}", e);
        }
    }
}
