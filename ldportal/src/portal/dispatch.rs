// ldportal/src/portal/dispatch.rs
//! Reader thread: one frame at a time, in device order.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::catalog::Catalog;
use crate::constants::IDENTITY_PAGE;
use crate::portal::config::PortalConfig;
use crate::portal::events::{EventHub, TagEvent};
use crate::portal::pending::{PendingTable, Ticket, Waiter};
use crate::portal::presence::{PadTag, PresenceTracker, Transition};
use crate::protocol::{Command, Frame, Message, Reply, Source, TagPresence};
use crate::tag::{self, TagIdentity};
use crate::transport::Transport;
use crate::utils::bytes_to_hex_spaced;
use crate::Result;

// 読み取りエラー後の待ち時間
const ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// State shared between the portal handle and its reader thread.
pub(crate) struct Shared {
    pub transport: Box<dyn Transport>,
    pub config: PortalConfig,
    pub pending: Arc<PendingTable>,
    pub presence: Mutex<PresenceTracker>,
    pub events: EventHub,
    pub catalog: Arc<dyn Catalog>,
    pub fetch_details: AtomicBool,
    pub stop: AtomicBool,
}

impl Shared {
    pub fn new(
        transport: Box<dyn Transport>,
        config: PortalConfig,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        let fetch = config.fetch_tag_details;
        Self {
            transport,
            config,
            pending: Arc::new(PendingTable::new()),
            presence: Mutex::new(PresenceTracker::new()),
            events: EventHub::new(),
            catalog,
            fetch_details: AtomicBool::new(fetch),
            stop: AtomicBool::new(false),
        }
    }

    pub fn presence(&self) -> MutexGuard<'_, PresenceTracker> {
        self.presence.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn send_frame(&self, frame: &Frame) -> Result<()> {
        debug!("SND: {}", bytes_to_hex_spaced(frame.as_bytes()));
        self.transport.write_frame(frame)
    }

    /// Register `cmd` under a fresh id, then write it. The entry is removed
    /// again if encoding or the write fails.
    pub fn send_command(&self, cmd: &Command, waiter: Waiter) -> Result<Ticket> {
        let ticket = self.pending.register(cmd.kind(), waiter)?;
        let written = cmd
            .to_frame(ticket.id)
            .and_then(|frame| self.send_frame(&frame));
        if let Err(e) = written {
            self.pending.cancel(ticket);
            return Err(e);
        }
        Ok(ticket)
    }

    fn publish(&self, tag: &PadTag) {
        let event = TagEvent::from_tag(tag, self.catalog.as_ref());
        self.events.publish(&event);
    }

    fn handle_frame(&self, frame: &Frame) -> Result<()> {
        let msg = frame.decode(Source::Portal)?;
        if msg.is_event() {
            self.handle_event(&TagPresence::from_message(&msg)?);
        } else {
            self.handle_reply(&msg)?;
        }
        Ok(())
    }

    fn handle_event(&self, ev: &TagPresence) {
        let transition = self.presence().observe(ev);
        match transition {
            Transition::Arrived(tag) => {
                if !self.fetch_details.load(Ordering::Acquire) {
                    self.publish(&tag);
                    return;
                }
                let read = Command::Read {
                    index: tag.index,
                    page: IDENTITY_PAGE,
                };
                match self.send_command(&read, Waiter::Background) {
                    Ok(ticket) => {
                        trace!("identity read {} for {}", ticket.id, tag.uid);
                        self.presence().attach_read(&tag.uid, ticket.id);
                    }
                    Err(e) => {
                        warn!("identity read for {} not sent: {}", tag.uid, e);
                        self.publish(&tag);
                    }
                }
            }
            Transition::Departed(mut tag) => {
                // arrival was never announced: do it now, without identity
                if let Some(id) = tag.last_read_id.take() {
                    self.pending.take(id);
                    let mut arrived = tag.clone();
                    arrived.present = true;
                    self.publish(&arrived);
                }
                self.publish(&tag);
            }
            Transition::Refreshed => trace!("{} still present", ev.uid),
            Transition::Ignored => debug!("removal of untracked tag {}", ev.uid),
        }
    }

    fn handle_reply(&self, msg: &Message) -> Result<()> {
        let id = msg.id();
        let Some(entry) = self.pending.take(id) else {
            debug!("reply {} has no pending command", id);
            return Ok(());
        };
        let reply = Reply::decode(entry.kind, msg.payload());

        match entry.waiter {
            Waiter::Caller(tx) => {
                let reply = reply?;
                if let Reply::TagList(entries) = &reply {
                    self.presence().replace_present(entries);
                }
                // the caller may have timed out already
                let _ = tx.try_send(reply);
            }
            Waiter::Background => {
                let identity = match reply {
                    Ok(Reply::Page { status: 0, data }) => self.identify(id, &data),
                    Ok(Reply::Page { status, .. }) => {
                        debug!("identity read {} failed: status={:#04x}", id, status);
                        None
                    }
                    Ok(other) => {
                        warn!("identity read {} got {:?}", id, other);
                        None
                    }
                    Err(e) => {
                        warn!("identity read {} undecodable: {}", id, e);
                        None
                    }
                };
                let resolved = self.presence().resolve_read(id, identity);
                match resolved {
                    Some(tag) => self.publish(&tag),
                    None => debug!("identity read {} outlived its tag", id),
                }
            }
            Waiter::Discard if entry.kind.expects_reply() => {
                debug!("reply {} to {:?} dropped: nobody waits for it", id, entry.kind)
            }
            Waiter::Discard => trace!("ack {} ({:?})", id, entry.kind),
        }
        Ok(())
    }

    fn identify(&self, id: u8, data: &[u8]) -> Option<TagIdentity> {
        let uid = self.presence().pending_read(id)?;
        match tag::identify(&uid, data) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!("cannot identify {}: {}", uid, e);
                None
            }
        }
    }

    /// Give up on identity reads the portal never answered; the arrival is
    /// announced without identity.
    fn expire_stale_reads(&self) {
        for id in self.pending.prune_stale(self.config.stale_read_expiry) {
            let resolved = self.presence().resolve_read(id, None);
            if let Some(tag) = resolved {
                warn!("identity read {} for {} expired", id, tag.uid);
                self.publish(&tag);
            }
        }
    }
}

/// Reader thread body. Returns once `stop` is set.
pub(crate) fn run(shared: Arc<Shared>) {
    debug!("dispatch loop started");
    while !shared.stop.load(Ordering::Acquire) {
        match shared.transport.read_frame(shared.config.io_timeout) {
            Ok(Some(frame)) => {
                debug!("REC: {}", bytes_to_hex_spaced(frame.as_bytes()));
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| shared.handle_frame(&frame)));
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) if e.is_malformed_frame() => warn!("dropped frame: {}", e),
                    Ok(Err(e)) => warn!("frame not handled: {}", e),
                    Err(_) => warn!("panic while handling {:?}", frame),
                }
            }
            Ok(None) => {}
            Err(e) => {
                if shared.stop.load(Ordering::Acquire) {
                    break;
                }
                warn!("read failed: {}", e);
                thread::sleep(ERROR_BACKOFF);
            }
        }
        shared.expire_stale_reads();
    }
    debug!("dispatch loop stopped");
}
