use ldportal::tag::{self, TagIdentity};
use ldportal::Uid;

use crate::common::fixtures;

#[test]
fn password_vector() {
    let uid = Uid::from_bytes(fixtures::PASSWORD_UID);
    assert_eq!(tag::derive_password(&uid), [0xA1, 0x7B, 0x4C, 0x95]);
    assert_eq!(hex::encode(tag::derive_password(&uid)), "a17b4c95");
}

#[test]
fn vehicle_vector() {
    let data = fixtures::vehicle_block();
    assert_eq!(tag::encrypt_vehicle_id(1123), [0x63, 0x04, 0x00, 0x00]);
    assert!(tag::is_vehicle(&data[8..12]));
    assert_eq!(tag::decrypt_vehicle_id(&data).unwrap(), 1123);
}

#[test]
fn character_vector() {
    let uid = Uid::from_bytes(fixtures::CHARACTER_UID);
    let data = fixtures::character_block();
    assert!(!tag::is_vehicle(&data[8..12]));
    assert_eq!(tag::decrypt_character_id(&uid, &data[..8]).unwrap(), 16);
    assert_eq!(tag::encrypt_character_id(&uid, 16).to_vec(), data[..8].to_vec());
}

#[test]
fn identify_classifies_blocks() {
    let uid = Uid::from_bytes(fixtures::CHARACTER_UID);
    assert_eq!(
        tag::identify(&uid, &fixtures::vehicle_block()).unwrap(),
        TagIdentity::Vehicle(1123)
    );
    assert_eq!(
        tag::identify(&uid, &fixtures::character_block()).unwrap(),
        TagIdentity::Character(16)
    );
    // fewer than three pages cannot be classified
    assert!(tag::identify(&uid, &[0u8; 8]).is_err());
}

#[test]
fn provisioning_pages() {
    let uid = Uid::from_bytes(fixtures::CHARACTER_UID);
    let pages = tag::character_pages(&uid, 16);
    assert_eq!(pages[0], (0x24, [0x5C, 0xF7, 0x1C, 0xDE]));
    assert_eq!(pages[1], (0x25, [0x29, 0xAD, 0xEA, 0x08]));

    let pages = tag::vehicle_pages(1123);
    assert_eq!(pages[0], (0x24, [0x63, 0x04, 0x00, 0x00]));
    assert_eq!(pages[1], (0x26, [0x00, 0x01, 0x00, 0x00]));
}
