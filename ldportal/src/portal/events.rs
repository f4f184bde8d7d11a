// ldportal/src/portal/events.rs
//! Tag events and their fan-out to subscribers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use crate::catalog::{Catalog, CatalogEntry};
use crate::portal::presence::PadTag;
use crate::tag::TagIdentity;
use crate::types::{Pad, TagType, Uid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag arrived on / left a pad.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TagEvent {
    /// Pad the tag sits (or sat) on
    pub pad: Pad,
    /// `true` on arrival, `false` on departure
    pub present: bool,
    /// Tag family
    pub tag_type: TagType,
    /// Slot index
    pub index: u8,
    /// Tag UID
    pub uid: Uid,
    /// Decoded id, if the identity pages were read
    pub identity: Option<TagIdentity>,
    /// Catalog record for `identity`, if the catalog knows it
    pub entry: Option<CatalogEntry>,
}

impl TagEvent {
    /// Event for `tag`, with the catalog entry filled in.
    pub fn from_tag(tag: &PadTag, catalog: &dyn Catalog) -> Self {
        Self {
            pad: tag.pad,
            present: tag.present,
            tag_type: tag.tag_type,
            index: tag.index,
            uid: tag.uid,
            identity: tag.identity,
            entry: tag.identity.and_then(|i| catalog.lookup(i).cloned()),
        }
    }
}

/// Fan-out to subscribers. Channels are unbounded so publishing never
/// blocks the dispatch loop.
#[derive(Debug, Default)]
pub struct EventHub {
    subscribers: Mutex<Vec<Sender<TagEvent>>>,
}

impl EventHub {
    /// Hub without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// New receiver for every event published from now on.
    pub fn subscribe(&self) -> Receiver<TagEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(tx);
        rx
    }

    /// Deliver to every live subscriber; dropped receivers are forgotten.
    pub fn publish(&self, event: &TagEvent) {
        let mut subs = self.subscribers.lock().unwrap_or_else(|p| p.into_inner());
        subs.retain(|tx| tx.send(event.clone()).is_ok());
        log::debug!(
            "tag event pad={:?} present={} uid={} -> {} subscriber(s)",
            event.pad,
            event.present,
            event.uid,
            subs.len()
        );
    }

    /// Subscribers still registered. Dropped receivers are only noticed on
    /// the next publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .len()
    }
}
