// ldportal/src/portal/pending.rs
//! Correlation table: message id → command waiting for its reply.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::protocol::{CommandKind, Reply};
use crate::{Error, Result};

/// Who consumes the reply.
#[derive(Debug)]
pub(crate) enum Waiter {
    /// A caller blocked in `PendingCommand::wait`
    Caller(SyncSender<Reply>),
    /// Identity read issued by the dispatch loop for a new tag
    Background,
    /// Fire-and-forget command; the reply only frees the id
    Discard,
}

#[derive(Debug)]
pub(crate) struct Entry {
    pub kind: CommandKind,
    pub waiter: Waiter,
    ticket: u64,
    issued_at: Instant,
}

/// Id plus a table-wide sequence number, so a dropped handle never cancels
/// a newer command that reused its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket {
    pub id: u8,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: u8,
    next_seq: u64,
    entries: HashMap<u8, Entry>,
}

/// Commands waiting for a reply, by message id.
#[derive(Debug, Default)]
pub struct PendingTable {
    inner: Mutex<Inner>,
}

impl PendingTable {
    /// Empty table; the first id handed out is 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Assign the next free id (1..=255, wrapping, skipping ids in flight)
    /// and register `kind` under it.
    pub(crate) fn register(&self, kind: CommandKind, waiter: Waiter) -> Result<Ticket> {
        let mut inner = self.lock();
        for _ in 0..u8::MAX {
            let id = if inner.last_id == u8::MAX {
                1
            } else {
                inner.last_id + 1
            };
            inner.last_id = id;
            if inner.entries.contains_key(&id) {
                continue;
            }
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.entries.insert(
                id,
                Entry {
                    kind,
                    waiter,
                    ticket: seq,
                    issued_at: Instant::now(),
                },
            );
            return Ok(Ticket { id, seq });
        }
        Err(Error::NoFreeMessageId)
    }

    /// Restart numbering so the next command gets id 1 (wake).
    pub fn reset_sequence(&self) {
        self.lock().last_id = 0;
    }

    /// Remove and return the entry for a reply's id.
    pub(crate) fn take(&self, id: u8) -> Option<Entry> {
        self.lock().entries.remove(&id)
    }

    /// Drop the entry for `ticket` if it is still the one registered.
    pub(crate) fn cancel(&self, ticket: Ticket) -> bool {
        let mut inner = self.lock();
        match inner.entries.get(&ticket.id) {
            Some(e) if e.ticket == ticket.seq => {
                inner.entries.remove(&ticket.id);
                true
            }
            _ => false,
        }
    }

    /// Remove background and fire-and-forget entries older than `expiry`.
    /// Returns the ids of the dropped background reads.
    pub(crate) fn prune_stale(&self, expiry: Duration) -> Vec<u8> {
        let mut inner = self.lock();
        let now = Instant::now();
        let mut dropped = Vec::new();
        inner.entries.retain(|id, e| {
            let stale = now.duration_since(e.issued_at) >= expiry;
            match e.waiter {
                Waiter::Caller(_) => true,
                Waiter::Background if stale => {
                    dropped.push(*id);
                    false
                }
                _ => !stale,
            }
        });
        dropped
    }

    /// `true` while `id` waits for a reply.
    pub fn contains(&self, id: u8) -> bool {
        self.lock().entries.contains_key(&id)
    }

    /// Command registered under `id`.
    pub fn kind_of(&self, id: u8) -> Option<CommandKind> {
        self.lock().entries.get(&id).map(|e| e.kind)
    }

    /// Entries in flight.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// `true` when nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle on a command issued with `Portal::issue`. Dropping it (or waiting
/// on it) removes its correlation entry.
#[derive(Debug)]
pub struct PendingCommand {
    ticket: Ticket,
    kind: CommandKind,
    rx: Receiver<Reply>,
    table: Arc<PendingTable>,
}

impl PendingCommand {
    pub(crate) fn new(
        ticket: Ticket,
        kind: CommandKind,
        rx: Receiver<Reply>,
        table: Arc<PendingTable>,
    ) -> Self {
        Self {
            ticket,
            kind,
            rx,
            table,
        }
    }

    /// Message id the command was sent with.
    pub fn id(&self) -> u8 {
        self.ticket.id
    }

    /// Command kind the reply will be decoded as.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Block until the reply arrives. `None` after `timeout`.
    pub fn wait(self, timeout: Duration) -> Option<Reply> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl Drop for PendingCommand {
    fn drop(&mut self) {
        self.table.cancel(self.ticket);
    }
}
