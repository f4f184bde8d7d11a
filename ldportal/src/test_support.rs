//! Helpers shared by unit tests and the tests/ crates: frame builders, a
//! fake toy pad that answers commands, and MockTransport-backed portals.
#![allow(dead_code)]

use std::collections::HashMap;

use crate::constants::{READ_BLOCK_LEN, WAKE_GREETING, WAKE_SERIAL_OFFSET, WRITE_PAGE_LEN};
use crate::portal::{Portal, PortalConfig};
use crate::protocol::parser::{byte_at, slice_at};
use crate::protocol::{CommandKind, Direction, Frame, Message, TagPresence};
use crate::transport::MockTransport;
use crate::types::{Color, Pad, TagType, Uid};
use crate::utils::ms;
use crate::Result;

/// Serial number reported by [`FakePortal`]
pub const FAKE_SERIAL: &[u8] = b"SERIAL";

/// Route `log` output through the test harness.
#[cfg(test)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Event frame for `uid` on `pad`/`index`.
#[doc(hidden)]
pub fn event_frame(pad: Pad, index: u8, direction: Direction, uid: [u8; 7]) -> Result<Frame> {
    TagPresence {
        pad,
        tag_type: TagType::NTAG213,
        index,
        direction,
        uid: Uid::from_bytes(uid),
    }
    .to_frame()
}

/// Reply frame with message id `id`.
#[doc(hidden)]
pub fn response_frame(id: u8, payload: &[u8]) -> Result<Frame> {
    Frame::response(id, payload)
}

/// Device side of the protocol with just enough state for the portal
/// operations: pad colours, tag pages and a fixed tag list.
#[doc(hidden)]
#[derive(Debug, Clone, Default)]
pub struct FakePortal {
    colors: [Color; 3],
    pages: HashMap<(u8, u8), [u8; WRITE_PAGE_LEN]>,
    tag_list: Vec<u8>,
    /// Tag status returned for reads and writes
    tag_status: u8,
}

impl FakePortal {
    /// Device with black pads, blank tags and an empty tag list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload one tag page.
    pub fn with_page(mut self, index: u8, page: u8, data: [u8; WRITE_PAGE_LEN]) -> Self {
        self.pages.insert((index, page), data);
        self
    }

    /// Tag list reply: `(pad, index, tag type)` triples.
    pub fn with_tag_list(mut self, tags: &[(Pad, u8, u8)]) -> Self {
        self.tag_list = tags
            .iter()
            .flat_map(|(pad, index, ty)| [pad.as_u8() << 4 | (index & 0x0f), *ty])
            .collect();
        self
    }

    /// Status byte answered to every read and write.
    pub fn with_tag_status(mut self, status: u8) -> Self {
        self.tag_status = status;
        self
    }

    fn read_block(&self, index: u8, page: u8) -> Vec<u8> {
        let mut out = Vec::with_capacity(READ_BLOCK_LEN);
        for p in 0..4u8 {
            let data = self
                .pages
                .get(&(index, page.wrapping_add(p)))
                .copied()
                .unwrap_or_default();
            out.extend_from_slice(&data);
        }
        out
    }

    /// Answer one host command; `None` for commands the device ignores
    /// and for payloads too short to act on.
    pub fn answer(&mut self, msg: &Message) -> Option<Frame> {
        let payload = match self.reply_payload(msg.command_kind()?, msg.payload()) {
            Ok(payload) => payload,
            Err(e) => {
                log::debug!("fake portal ignores {:?}: {}", msg.command_kind(), e);
                return None;
            }
        };
        response_frame(msg.id(), &payload).ok()
    }

    fn reply_payload(&mut self, kind: CommandKind, p: &[u8]) -> Result<Vec<u8>> {
        let payload = match kind {
            CommandKind::Wake => {
                let mut out = WAKE_GREETING[..WAKE_SERIAL_OFFSET].to_vec();
                out.extend_from_slice(FAKE_SERIAL);
                out
            }
            CommandKind::Color => {
                let rgb = slice_at(p, 1, 3)?;
                let color = Color::rgb(rgb[0], rgb[1], rgb[2]);
                match Pad::from_u8(byte_at(p, 0)?) {
                    Some(Pad::All) => self.colors = [color; 3],
                    Some(pad) => self.colors[usize::from(pad.as_u8() - 1)] = color,
                    None => {}
                }
                Vec::new()
            }
            CommandKind::ColorAll => {
                for (slot, chunk) in p.chunks_exact(4).take(3).enumerate() {
                    if chunk[0] != 0 {
                        self.colors[slot] = Color::rgb(chunk[1], chunk[2], chunk[3]);
                    }
                }
                Vec::new()
            }
            CommandKind::GetColor => {
                let slot = usize::from(byte_at(p, 0)?.max(1) - 1).min(2);
                self.colors[slot].to_bytes().to_vec()
            }
            CommandKind::Read => {
                let (index, page) = (byte_at(p, 0)?, byte_at(p, 1)?);
                let mut out = vec![self.tag_status];
                if self.tag_status == 0 {
                    out.extend_from_slice(&self.read_block(index, page));
                }
                out
            }
            CommandKind::Write => {
                let (index, page) = (byte_at(p, 0)?, byte_at(p, 1)?);
                let bytes = slice_at(p, 2, WRITE_PAGE_LEN)?;
                if self.tag_status == 0 {
                    let mut data = [0u8; WRITE_PAGE_LEN];
                    data.copy_from_slice(bytes);
                    self.pages.insert((index, page), data);
                }
                vec![self.tag_status]
            }
            CommandKind::Model => {
                let mut out = vec![0];
                out.extend_from_slice(slice_at(p, 0, 8)?);
                out
            }
            CommandKind::Challenge => vec![0xC4, 0x5E, 0x11, 0x8A, 0x03, 0x72, 0xB9, 0x0D],
            CommandKind::TagList => self.tag_list.clone(),
            _ => Vec::new(),
        };
        Ok(payload)
    }

    /// Responder closure for `MockTransport`.
    pub fn into_responder(mut self) -> impl FnMut(&Message) -> Vec<Frame> + Send + 'static {
        move |msg: &Message| self.answer(msg).into_iter().collect()
    }
}

/// Responder that answers everything with a blank device.
#[doc(hidden)]
pub fn default_responder() -> impl FnMut(&Message) -> Vec<Frame> + Send + 'static {
    FakePortal::new().into_responder()
}

/// Config with short timeouts so tests never sit in a full USB timeout.
#[doc(hidden)]
pub fn test_config() -> PortalConfig {
    PortalConfig::default()
        .with_io_timeout(ms(10))
        .with_receive_timeout(ms(500))
}

/// Portal on a MockTransport driven by `responder`. The returned mock
/// shares state with the one the portal owns.
#[doc(hidden)]
pub fn mock_portal<F>(responder: F) -> Result<(Portal, MockTransport)>
where
    F: FnMut(&Message) -> Vec<Frame> + Send + 'static,
{
    let mock = MockTransport::with_responder(responder);
    let portal = Portal::with_transport(Box::new(mock.clone()), test_config())?;
    Ok((portal, mock))
}
