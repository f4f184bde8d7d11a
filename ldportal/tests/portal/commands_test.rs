use std::time::Duration;

use ldportal::protocol::{Command, CommandKind, Reply};
use ldportal::test_support::{default_responder, mock_portal, FAKE_SERIAL};
use ldportal::transport::MockTransport;
use ldportal::utils::ms;
use ldportal::{Color, FadePad, FlashPad, Pad, Portal, PortalConfig};

fn silent_portal() -> (Portal, MockTransport) {
    let mock = MockTransport::new();
    let config = PortalConfig::default()
        .with_io_timeout(ms(5))
        .with_receive_timeout(ms(50));
    let portal = Portal::with_transport(Box::new(mock.clone()), config).unwrap();
    (portal, mock)
}

#[test]
fn wake_restarts_message_ids() {
    let (portal, mock) = mock_portal(default_responder()).unwrap();
    portal.set_color(Pad::Center, Color::RED).unwrap();
    assert_eq!(portal.wake().unwrap(), FAKE_SERIAL.to_vec());

    let sent = mock.sent_messages();
    let ids: Vec<u8> = sent.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec![1, 2, 1]);
    assert_eq!(sent[2].command_kind(), Some(CommandKind::Wake));
}

#[test]
fn colors_round_trip_through_the_device() {
    let (portal, _mock) = mock_portal(default_responder()).unwrap();
    portal.set_color(Pad::Left, Color::rgb(1, 2, 3)).unwrap();
    assert_eq!(portal.get_color(Pad::Left).unwrap(), Color::rgb(1, 2, 3));

    portal
        .set_color_all([Some(Color::BLUE), None, Some(Color::WHITE)])
        .unwrap();
    assert_eq!(portal.get_color(Pad::Center).unwrap(), Color::BLUE);
    assert_eq!(portal.get_color(Pad::Left).unwrap(), Color::rgb(1, 2, 3));
    assert_eq!(portal.get_color(Pad::Right).unwrap(), Color::WHITE);

    portal.switch_off_all().unwrap();
    for pad in [Pad::Center, Pad::Left, Pad::Right] {
        assert_eq!(portal.get_color(pad).unwrap(), Color::BLACK);
    }
}

#[test]
fn light_effects_write_one_frame_each() {
    let (portal, mock) = mock_portal(default_responder()).unwrap();
    let before = mock.sent().len();
    let flash = FlashPad::new(10, 10, 4, Color::GREEN);
    let fade = FadePad::new(6, 2, Color::RED);
    portal.flash(Pad::Right, flash).unwrap();
    portal.flash_all([flash; 3]).unwrap();
    portal.fade(Pad::Left, fade).unwrap();
    portal.fade_all([fade, FadePad::disabled(), fade]).unwrap();
    portal.fade_random(Pad::All, 20, 5).unwrap();

    let kinds: Vec<_> = mock.sent_messages()[before..]
        .iter()
        .filter_map(|m| m.command_kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            CommandKind::Flash,
            CommandKind::FlashAll,
            CommandKind::Fade,
            CommandKind::FadeAll,
            CommandKind::FadeRandom
        ]
    );
}

#[test]
fn challenge_and_tag_information() {
    let (portal, _mock) = mock_portal(default_responder()).unwrap();
    assert_eq!(portal.challenge().unwrap().len(), 8);
    let info = portal.tag_information(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(info, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn timeouts_return_defaults_and_free_ids() {
    let (portal, _mock) = silent_portal();
    assert!(portal.serial_number().is_empty());
    assert_eq!(portal.get_color(Pad::Right).unwrap(), Color::BLACK);
    assert!(portal.read_tag(0, 0x24).unwrap().is_empty());
    assert_eq!(portal.try_read_tag(0, 0x24).unwrap(), None);
    assert!(!portal.write_tag(0, 0x24, [0; 4]).unwrap());
    assert!(portal.challenge().unwrap().is_empty());
    assert!(portal.list_tags().unwrap().is_empty());
    assert_eq!(portal.in_flight(), 0);
}

#[test]
fn issue_and_await_by_hand() {
    let (portal, _mock) = mock_portal(default_responder()).unwrap();
    let pending = portal.issue(&Command::GetColor { pad: Pad::Center }).unwrap();
    assert_eq!(pending.kind(), CommandKind::GetColor);
    let reply = portal.await_result(pending, Duration::from_secs(1));
    assert_eq!(reply, Some(Reply::Color(Color::BLACK)));

    // a dropped handle frees its id even if the reply never comes
    let (silent, _mock) = silent_portal();
    let pending = silent.issue(&Command::Challenge).unwrap();
    assert_eq!(silent.in_flight(), 1);
    drop(pending);
    assert_eq!(silent.in_flight(), 0);
}

#[test]
fn write_failure_surfaces_to_caller() {
    let (portal, mock) = mock_portal(default_responder()).unwrap();
    mock.set_write_failures(1);
    assert!(matches!(
        portal.set_color(Pad::Center, Color::RED),
        Err(ldportal::Error::TransportTimeout)
    ));
    assert_eq!(portal.in_flight(), 0);
    portal.set_color(Pad::Center, Color::RED).unwrap();
}

#[test]
fn toggles() {
    let (portal, mock) = mock_portal(default_responder()).unwrap();
    assert!(portal.fetch_tag_details());
    portal.set_fetch_tag_details(false);
    assert!(!portal.fetch_tag_details());

    assert!(portal.nfc_enabled());
    portal.set_nfc_enabled(false).unwrap();
    assert!(!portal.nfc_enabled());
    let last = mock.sent_messages().pop().unwrap();
    assert_eq!(last.command_kind(), Some(CommandKind::ConfigActive));
}
