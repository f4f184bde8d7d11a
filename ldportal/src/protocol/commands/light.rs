// ldportal/src/protocol/commands/light.rs
//! Lighting payload encoders.

use crate::types::{Color, FadePad, FlashPad, Pad};

/// Color (0xC0): pad + RGB
pub fn encode_color(pad: Pad, color: Color) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4);
    buf.push(pad.as_u8());
    buf.extend_from_slice(&color.to_bytes());
    buf
}

/// GetColor (0xC1): pad only. The portal answers with R,G,B.
pub fn encode_get_color(pad: Pad) -> Vec<u8> {
    vec![pad.as_u8()]
}

/// ColorAll (0xC8): (enabled, R, G, B) for center, left, right.
/// A `None` pad keeps its current colour.
pub fn encode_color_all(colors: &[Option<Color>; 3]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(12);
    for c in colors {
        buf.push(c.is_some() as u8);
        buf.extend_from_slice(&c.unwrap_or(Color::BLACK).to_bytes());
    }
    buf
}

/// Flash (0xC3): pad, on, off, count, RGB. `enabled` is not sent.
pub fn encode_flash(pad: Pad, flash: &FlashPad) -> Vec<u8> {
    let mut buf = Vec::with_capacity(7);
    buf.push(pad.as_u8());
    buf.push(flash.tick_on);
    buf.push(flash.tick_off);
    buf.push(flash.tick_count);
    buf.extend_from_slice(&flash.color.to_bytes());
    buf
}

/// FlashAll (0xC7): (enabled, on, off, count, RGB) x 3
pub fn encode_flash_all(pads: &[FlashPad; 3]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(21);
    for p in pads {
        buf.push(p.enabled as u8);
        buf.push(p.tick_on);
        buf.push(p.tick_off);
        buf.push(p.tick_count);
        buf.extend_from_slice(&p.color.to_bytes());
    }
    buf
}

/// Fade (0xC2): pad, time, count, RGB
pub fn encode_fade(pad: Pad, fade: &FadePad) -> Vec<u8> {
    let mut buf = Vec::with_capacity(6);
    buf.push(pad.as_u8());
    buf.push(fade.tick_time);
    buf.push(fade.tick_count);
    buf.extend_from_slice(&fade.color.to_bytes());
    buf
}

/// FadeAll (0xC6): (enabled, time, count, RGB) x 3
pub fn encode_fade_all(pads: &[FadePad; 3]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(18);
    for p in pads {
        buf.push(p.enabled as u8);
        buf.push(p.tick_time);
        buf.push(p.tick_count);
        buf.extend_from_slice(&p.color.to_bytes());
    }
    buf
}

/// FadeRandom (0xC4): pad, time, count
pub fn encode_fade_random(pad: Pad, tick_time: u8, tick_count: u8) -> Vec<u8> {
    vec![pad.as_u8(), tick_time, tick_count]
}
