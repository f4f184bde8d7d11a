use std::sync::Arc;

use ldportal::catalog::{CatalogEntry, StaticCatalog};
use ldportal::protocol::{CommandKind, Direction};
use ldportal::tag::TagIdentity;
use ldportal::test_support::{event_frame, mock_portal, test_config, FakePortal};
use ldportal::transport::MockTransport;
use ldportal::{Pad, Portal};

use crate::common::{self, assert_quiet, fixtures, next_event};

#[test]
fn arrival_and_departure_are_announced_once() {
    common::init_logger();
    let config = test_config().with_fetch_tag_details(false);
    let mock = MockTransport::with_responder(FakePortal::new().into_responder());
    let portal = Portal::with_transport(Box::new(mock.clone()), config).unwrap();
    let events = portal.subscribe();
    let uid = fixtures::CHARACTER_UID;

    mock.push_frame(event_frame(Pad::Left, 1, Direction::Placed, uid).unwrap());
    let arrived = next_event(&events, "arrival");
    assert!(arrived.present);
    assert_eq!(arrived.pad, Pad::Left);
    assert_eq!(arrived.uid.as_bytes(), &uid);
    assert!(arrived.identity.is_none());

    // still present: no second arrival
    mock.push_frame(event_frame(Pad::Left, 1, Direction::Placed, uid).unwrap());
    assert_quiet(&events);
    assert_eq!(portal.present_tags().len(), 1);

    mock.push_frame(event_frame(Pad::Left, 1, Direction::Removed, uid).unwrap());
    let departed = next_event(&events, "departure");
    assert!(!departed.present);
    assert_eq!(departed.uid.as_bytes(), &uid);
    assert_quiet(&events);
    assert!(portal.present_tags().is_empty());
    assert!(portal.pad_tags().is_empty());
}

#[test]
fn arrival_carries_resolved_character() {
    common::init_logger();
    let block = fixtures::character_block();
    let mut fake = FakePortal::new();
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        let mut page = [0u8; 4];
        page.copy_from_slice(chunk);
        fake = fake.with_page(2, 0x24 + i as u8, page);
    }
    let catalog = StaticCatalog::new().with_character(CatalogEntry::new(16, "Cyborg", "DC Comics"));
    let mock = MockTransport::with_responder(fake.into_responder());
    let portal = Portal::builder()
        .transport(Box::new(mock.clone()))
        .config(test_config())
        .catalog(Arc::new(catalog))
        .build()
        .unwrap();
    let events = portal.subscribe();

    mock.push_frame(event_frame(Pad::Right, 2, Direction::Placed, fixtures::CHARACTER_UID).unwrap());
    let ev = next_event(&events, "resolved arrival");
    assert!(ev.present);
    assert_eq!(ev.identity, Some(TagIdentity::Character(16)));
    assert_eq!(ev.entry.map(|e| e.name), Some("Cyborg".to_string()));

    let reads: Vec<_> = mock
        .sent_messages()
        .into_iter()
        .filter(|m| m.command_kind() == Some(CommandKind::Read))
        .collect();
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].payload(), &[2, 0x24]);
    assert_eq!(portal.pad_tags()[0].identity, Some(TagIdentity::Character(16)));
    assert_eq!(portal.in_flight(), 0);
}

#[test]
fn arrival_with_vehicle_tag() {
    let block = fixtures::vehicle_block();
    let mut fake = FakePortal::new();
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        let mut page = [0u8; 4];
        page.copy_from_slice(chunk);
        fake = fake.with_page(0, 0x24 + i as u8, page);
    }
    let (portal, mock) = mock_portal(fake.into_responder()).unwrap();
    let events = portal.subscribe();

    mock.push_frame(event_frame(Pad::Center, 0, Direction::Placed, [1, 2, 3, 4, 5, 6, 7]).unwrap());
    let ev = next_event(&events, "vehicle arrival");
    assert_eq!(ev.identity, Some(TagIdentity::Vehicle(1123)));
    // no catalog configured
    assert!(ev.entry.is_none());
}

#[test]
fn failed_identity_read_still_announces_arrival() {
    let (portal, mock) = mock_portal(FakePortal::new().with_tag_status(0x80).into_responder()).unwrap();
    let events = portal.subscribe();

    mock.push_frame(event_frame(Pad::Center, 0, Direction::Placed, fixtures::CHARACTER_UID).unwrap());
    let ev = next_event(&events, "arrival without identity");
    assert!(ev.present);
    assert!(ev.identity.is_none());
}

#[test]
fn list_tags_replaces_present_set() {
    let fake = FakePortal::new().with_tag_list(&[(Pad::Center, 0, 0), (Pad::Right, 1, 0)]);
    let (portal, mock) = mock_portal(fake.into_responder()).unwrap();
    portal.set_fetch_tag_details(false);
    let events = portal.subscribe();

    mock.push_frame(event_frame(Pad::Center, 0, Direction::Placed, fixtures::CHARACTER_UID).unwrap());
    next_event(&events, "arrival");

    let present = portal.list_tags().unwrap();
    assert_eq!(present.len(), 2);
    assert_eq!(present[0].pad, Pad::Center);
    assert_eq!(
        present[0].uid.map(|u| *u.as_bytes()),
        Some(fixtures::CHARACTER_UID)
    );
    assert_eq!(present[1].pad, Pad::Right);
    assert_eq!(present[1].uid, None);
    assert_eq!(portal.present_tags(), present);
}

#[test]
fn malformed_frames_do_not_stop_the_loop() {
    let (portal, mock) = mock_portal(FakePortal::new().into_responder()).unwrap();
    portal.set_fetch_tag_details(false);
    let events = portal.subscribe();

    // bad checksum
    let mut bytes = *event_frame(Pad::Left, 0, Direction::Placed, [9; 7]).unwrap().as_bytes();
    bytes[8] ^= 0x55;
    mock.push_frame(ldportal::protocol::Frame::from_bytes(&bytes).unwrap());
    // reply nobody waits for
    mock.push_frame(ldportal::test_support::response_frame(77, &[1, 2, 3]).unwrap());

    mock.push_frame(event_frame(Pad::Left, 0, Direction::Placed, [8; 7]).unwrap());
    let ev = next_event(&events, "event after garbage");
    assert_eq!(ev.uid.as_bytes(), &[8; 7]);
    assert_quiet(&events);
}
