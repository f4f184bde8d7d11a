// ldportal/src/protocol/responses/light.rs
//! Colour reply payloads.

use crate::protocol::parser;
use crate::types::Color;
use crate::Result;

/// Decode GetColor reply: R, G, B
pub fn decode_get_color(data: &[u8]) -> Result<Color> {
    let rgb = parser::slice_at(data, 0, 3)?;
    Ok(Color::rgb(rgb[0], rgb[1], rgb[2]))
}
