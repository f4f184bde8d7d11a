#![cfg(feature = "usb")]

use std::time::Duration;

use ldportal::transport::UsbSession;
use ldportal::{Color, Pad};
use serial_test::serial;

use crate::common::open_portal;

#[test]
#[ignore = "requires a toy pad"]
#[serial]
fn enumerate_portals() {
    let session = UsbSession::global().unwrap();
    let portals = session.portals().unwrap();
    println!("{} toy pad(s) attached", portals.len());
}

#[test]
#[ignore = "requires a toy pad"]
#[serial]
fn wake_reports_serial() {
    let Some(portal) = open_portal().unwrap() else {
        return;
    };
    assert!(!portal.serial_number().is_empty());
    portal.close().unwrap();
}

#[test]
#[ignore = "requires a toy pad"]
#[serial]
fn colors_read_back() {
    let Some(portal) = open_portal().unwrap() else {
        return;
    };
    portal.set_color(Pad::Center, Color::rgb(0x20, 0x40, 0x60)).unwrap();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(
        portal.get_color(Pad::Center).unwrap(),
        Color::rgb(0x20, 0x40, 0x60)
    );
    portal.switch_off_all().unwrap();
}

#[test]
#[ignore = "requires a toy pad and a tag on the centre pad"]
#[serial]
fn tag_on_center_pad_is_identified() {
    let Some(portal) = open_portal().unwrap() else {
        return;
    };
    let events = portal.subscribe();
    let ev = events.recv_timeout(Duration::from_secs(10)).unwrap();
    println!("{:?} {} {:?}", ev.pad, ev.uid, ev.identity);
    assert!(ev.identity.is_some());
}
