use std::thread;

use ldportal::protocol::Direction;
use ldportal::test_support::{default_responder, event_frame, mock_portal};
use ldportal::{Color, Pad};

use crate::common::next_event;

#[test]
fn concurrent_callers_get_their_own_replies() {
    let (portal, _mock) = mock_portal(default_responder()).unwrap();
    portal.set_color(Pad::Center, Color::RED).unwrap();
    portal.set_color(Pad::Left, Color::GREEN).unwrap();
    portal.set_color(Pad::Right, Color::BLUE).unwrap();

    thread::scope(|s| {
        for (pad, color) in [
            (Pad::Center, Color::RED),
            (Pad::Left, Color::GREEN),
            (Pad::Right, Color::BLUE),
        ] {
            let portal = &portal;
            s.spawn(move || {
                for _ in 0..20 {
                    assert_eq!(portal.get_color(pad).unwrap(), color);
                }
            });
        }
    });
}

#[test]
fn events_interleave_with_commands() {
    let (portal, mock) = mock_portal(default_responder()).unwrap();
    portal.set_fetch_tag_details(false);
    let events = portal.subscribe();

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..10u8 {
                mock.push_frame(event_frame(Pad::Left, i, Direction::Placed, [i; 7]).unwrap());
            }
        });
        for _ in 0..10 {
            portal.get_color(Pad::Left).unwrap();
        }
    });

    for _ in 0..10 {
        assert!(next_event(&events, "arrival").present);
    }
    assert_eq!(portal.present_tags().len(), 10);
}

#[test]
fn many_commands_wrap_the_id_space() {
    let (portal, mock) = mock_portal(default_responder()).unwrap();
    for _ in 0..300 {
        portal.get_color(Pad::Center).unwrap();
    }
    let ids: Vec<u8> = mock.sent_messages().iter().map(|m| m.id()).collect();
    assert!(!ids.contains(&0));
    assert_eq!(ids[255], 1);
    assert_eq!(portal.in_flight(), 0);
}
