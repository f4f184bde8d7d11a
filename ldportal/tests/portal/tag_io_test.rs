use ldportal::protocol::{Command, CommandKind, Message};
use ldportal::tag::{self, TagIdentity};
use ldportal::test_support::{mock_portal, response_frame, FakePortal};
use ldportal::{Error, PasswordPolicy, Uid};

use crate::common::fixtures;

#[test]
fn write_then_read_back() {
    let (portal, _mock) = mock_portal(FakePortal::new().into_responder()).unwrap();
    assert!(portal.write_tag(1, 0x24, [0xDE, 0xAD, 0xBE, 0xEF]).unwrap());
    let data = portal.read_tag(1, 0x24).unwrap();
    assert_eq!(data.len(), 16);
    assert_eq!(&data[..4], &[0xDE, 0xAD, 0xBE, 0xEF]);
    // other slots are untouched
    assert_eq!(&portal.read_tag(2, 0x24).unwrap()[..4], &[0; 4]);
}

#[test]
fn tag_errors_surface_on_try_variants() {
    let (portal, _mock) = mock_portal(FakePortal::new().with_tag_status(0x80).into_responder()).unwrap();
    assert!(matches!(
        portal.try_read_tag(0, 0x24),
        Err(Error::AuthenticationFailed { status: 0x80 })
    ));
    assert!(matches!(
        portal.try_write_tag(0, 0x24, [0; 4]),
        Err(Error::AuthenticationFailed { status: 0x80 })
    ));
    // the plain variants fall back to defaults
    assert!(portal.read_tag(0, 0x24).unwrap().is_empty());
    assert!(!portal.write_tag(0, 0x24, [0; 4]).unwrap());
}

#[test]
fn program_vehicle_writes_identity_and_marker() {
    let (portal, mock) = mock_portal(FakePortal::new().into_responder()).unwrap();
    portal.program_vehicle(0, 1123).unwrap();

    let block = portal.read_tag(0, 0x24).unwrap();
    let uid = Uid::from_bytes([0; 7]);
    assert_eq!(tag::identify(&uid, &block).unwrap(), TagIdentity::Vehicle(1123));

    let writes: Vec<Message> = mock
        .sent_messages()
        .into_iter()
        .filter(|m| m.command_kind() == Some(CommandKind::Write))
        .collect();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].payload()[1], 0x24);
    assert_eq!(writes[1].payload()[1], 0x26);
}

#[test]
fn program_character_binds_to_uid() {
    let (portal, _mock) = mock_portal(FakePortal::new().into_responder()).unwrap();
    let uid = Uid::from_bytes(fixtures::CHARACTER_UID);
    portal.program_character(3, &uid, 16).unwrap();

    let block = portal.read_tag(3, 0x24).unwrap();
    assert_eq!(&block[..8], &fixtures::character_block()[..8]);
    assert_eq!(tag::identify(&uid, &block).unwrap(), TagIdentity::Character(16));
}

#[test]
fn verified_write_retries_with_password_then_gives_up() {
    let (portal, mock) = mock_portal(FakePortal::new().with_tag_status(0x01).into_responder()).unwrap();
    let err = portal
        .write_tag_verified(0, 0x24, [1, 2, 3, 4], 3)
        .unwrap_err();
    assert!(matches!(err, Error::VerificationFailed { page: 0x24, attempts: 3 }));

    let sent = mock.sent_messages();
    let count = |kind| sent.iter().filter(|m| m.command_kind() == Some(kind)).count();
    assert_eq!(count(CommandKind::Write), 3);
    assert_eq!(count(CommandKind::ConfigPassword), 2);
}

#[test]
fn verified_write_recovers_after_a_failed_attempt() {
    // first write is rejected, the rest go through
    let mut fake = FakePortal::new();
    let mut rejected = false;
    let responder = move |msg: &Message| {
        if msg.command_kind() == Some(CommandKind::Write) && !rejected {
            rejected = true;
            return vec![response_frame(msg.id(), &[0x01]).unwrap()];
        }
        fake.answer(msg).into_iter().collect()
    };
    let (portal, _mock) = mock_portal(responder).unwrap();
    portal.write_tag_verified(0, 0x26, [0, 1, 0, 0], 3).unwrap();
    assert_eq!(&portal.read_tag(0, 0x26).unwrap()[..4], &[0, 1, 0, 0]);
}

#[test]
fn password_policy_frames() {
    let (portal, mock) = mock_portal(FakePortal::new().into_responder()).unwrap();
    let uid = Uid::from_bytes(fixtures::PASSWORD_UID);
    let pwd = tag::derive_password(&uid);
    portal
        .set_tag_password(PasswordPolicy::Custom, 2, Some(pwd))
        .unwrap();
    portal
        .set_tag_password(PasswordPolicy::Disable, 2, Some(pwd))
        .unwrap();

    let sent: Vec<Message> = mock
        .sent_messages()
        .into_iter()
        .filter(|m| m.command_kind() == Some(CommandKind::ConfigPassword))
        .collect();
    assert_eq!(sent[0].payload(), &[0x02, 0x02, 0xA1, 0x7B, 0x4C, 0x95]);
    // the password is not sent unless it is used
    assert_eq!(sent[1].payload(), &[0x00, 0x02, 0, 0, 0, 0]);
    assert_eq!(
        sent[1],
        Message::command(
            CommandKind::ConfigPassword,
            sent[1].id(),
            Command::ConfigPassword {
                policy: PasswordPolicy::Disable,
                index: 2,
                password: [0; 4],
            }
            .payload()
        )
    );
}
