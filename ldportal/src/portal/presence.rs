// ldportal/src/portal/presence.rs
//! Which tags are on which pad, as seen through event frames.

use crate::protocol::{TagListEntry, TagPresence};
use crate::tag::TagIdentity;
use crate::types::{Pad, TagType, Uid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Full record of a tag sitting on a pad.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PadTag {
    /// Pad the tag sits on
    pub pad: Pad,
    /// Slot index the portal assigned; used to address reads and writes
    pub index: u8,
    /// `false` once the tag has been removed
    pub present: bool,
    /// Tag family
    pub tag_type: TagType,
    /// Tag UID
    pub uid: Uid,
    /// Decoded vehicle or character, once read
    pub identity: Option<TagIdentity>,
    /// Id of the background identity read still in flight
    pub last_read_id: Option<u8>,
}

/// Public "what's on the pads" view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PresentTag {
    /// Pad the tag sits on
    pub pad: Pad,
    /// Tag family
    pub tag_type: TagType,
    /// Slot index
    pub index: u8,
    /// `None` for tags only known from a tag list reply
    pub uid: Option<Uid>,
}

impl From<&PadTag> for PresentTag {
    fn from(t: &PadTag) -> Self {
        Self {
            pad: t.pad,
            tag_type: t.tag_type,
            index: t.index,
            uid: Some(t.uid),
        }
    }
}

/// Outcome of feeding one event into the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// New tag; its identity is not known yet
    Arrived(PadTag),
    /// Placed again while already tracked
    Refreshed,
    /// `last_read_id` is still set if the identity read never came back
    Departed(PadTag),
    /// Removal of a tag that was never tracked
    Ignored,
}

/// Tracked tags keyed by UID, plus the present list reported to callers.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    tags: Vec<PadTag>,
    present: Vec<PresentTag>,
}

impl PresenceTracker {
    /// Tracker with nothing on the pads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one presence event.
    pub fn observe(&mut self, ev: &TagPresence) -> Transition {
        let pos = self.tags.iter().position(|t| t.uid == ev.uid);
        match (ev.is_present(), pos) {
            (true, Some(i)) => {
                self.tags[i].present = true;
                Transition::Refreshed
            }
            (true, None) => {
                let tag = PadTag {
                    pad: ev.pad,
                    index: ev.index,
                    present: true,
                    tag_type: ev.tag_type,
                    uid: ev.uid,
                    identity: None,
                    last_read_id: None,
                };
                self.present.push(PresentTag::from(&tag));
                self.tags.push(tag.clone());
                Transition::Arrived(tag)
            }
            (false, Some(i)) => {
                let mut tag = self.tags.remove(i);
                tag.present = false;
                self.present.retain(|p| match p.uid {
                    Some(uid) => uid != tag.uid,
                    None => !(p.pad == tag.pad && p.index == tag.index),
                });
                Transition::Departed(tag)
            }
            (false, None) => Transition::Ignored,
        }
    }

    /// Remember the background read issued for `uid`.
    pub fn attach_read(&mut self, uid: &Uid, id: u8) -> bool {
        match self.tags.iter_mut().find(|t| t.uid == *uid) {
            Some(t) => {
                t.last_read_id = Some(id);
                true
            }
            None => false,
        }
    }

    /// UID of the tag waiting on background read `id`.
    pub fn pending_read(&self, id: u8) -> Option<Uid> {
        self.tags
            .iter()
            .find(|t| t.last_read_id == Some(id))
            .map(|t| t.uid)
    }

    /// Settle background read `id` and return the updated record.
    pub fn resolve_read(&mut self, id: u8, identity: Option<TagIdentity>) -> Option<PadTag> {
        let tag = self.tags.iter_mut().find(|t| t.last_read_id == Some(id))?;
        tag.last_read_id = None;
        tag.identity = identity;
        Some(tag.clone())
    }

    /// Replace the present list with a tag list reply. UIDs are filled in
    /// from tracked tags with the same slot index.
    pub fn replace_present(&mut self, entries: &[TagListEntry]) {
        self.present = entries
            .iter()
            .map(|e| PresentTag {
                pad: e.pad,
                tag_type: e.tag_type,
                index: e.index,
                uid: self
                    .tags
                    .iter()
                    .find(|t| t.index == e.index)
                    .map(|t| t.uid),
            })
            .collect();
    }

    /// Snapshot of the present list.
    pub fn present(&self) -> Vec<PresentTag> {
        self.present.clone()
    }

    /// Snapshot of every tracked tag.
    pub fn tags(&self) -> Vec<PadTag> {
        self.tags.clone()
    }

    /// Tracked tags on `pad`.
    pub fn on_pad(&self, pad: Pad) -> Vec<PadTag> {
        self.tags.iter().filter(|t| t.pad == pad).cloned().collect()
    }
}
