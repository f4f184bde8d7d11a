use ldportal::tag;
use ldportal::Uid;
use proptest::prelude::*;

proptest! {
    #[test]
    fn vehicle_ids_round_trip(id in any::<u16>()) {
        let enc = tag::encrypt_vehicle_id(id);
        prop_assert_eq!(tag::decrypt_vehicle_id(&enc).unwrap(), id);
    }

    #[test]
    fn character_ids_round_trip(uid in any::<[u8; 7]>(), id in any::<u16>()) {
        let uid = Uid::from_bytes(uid);
        let enc = tag::encrypt_character_id(&uid, id);
        prop_assert_eq!(tag::decrypt_character_id(&uid, &enc).unwrap(), id);
    }

    #[test]
    fn password_is_deterministic(uid in any::<[u8; 7]>()) {
        let uid = Uid::from_bytes(uid);
        prop_assert_eq!(tag::derive_password(&uid), tag::derive_password(&uid));
    }

    #[test]
    fn vehicle_marker_classifies(id in any::<u16>()) {
        let mut block = tag::encrypt_vehicle_id(id).to_vec();
        block.extend_from_slice(&[0; 4]);
        block.extend_from_slice(&ldportal::constants::VEHICLE_MARKER);
        prop_assert!(tag::is_vehicle(&block[8..12]));
        prop_assert_eq!(
            tag::identify(&Uid::from_bytes([0; 7]), &block).unwrap(),
            tag::TagIdentity::Vehicle(id)
        );
    }
}
