#![cfg(feature = "usb")]

//! Watch the toy pad: light a pad when a tag arrives, switch it off when
//! the tag leaves.
//!
//! Usage:
//!   RUST_LOG=ldportal=debug cargo run -p ldportal --example portal_monitor --features usb

use anyhow::Context;
use ldportal::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let portal = Portal::open().context("opening toy pad")?;
    println!("toy pad serial {}", bytes_to_hex(&portal.serial_number()));
    portal.flash_all([FlashPad::new(4, 4, 3, Color::WHITE); 3])?;

    for event in portal.subscribe() {
        let what = match (&event.entry, event.identity) {
            (Some(entry), _) => entry.name.clone(),
            (None, Some(TagIdentity::Vehicle(id))) => format!("vehicle {}", id),
            (None, Some(TagIdentity::Character(id))) => format!("character {}", id),
            (None, None) => "unknown tag".to_string(),
        };
        if event.present {
            println!("+ {:?} {} ({})", event.pad, what, event.uid);
            let color = if event.identity.is_some_and(|i| i.is_vehicle()) {
                Color::BLUE
            } else {
                Color::GREEN
            };
            portal.set_color(event.pad, color)?;
        } else {
            println!("- {:?} {} ({})", event.pad, what, event.uid);
            portal.set_color(event.pad, Color::BLACK)?;
        }
    }
    Ok(())
}
