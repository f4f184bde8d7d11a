use ldportal::protocol::{Command, CommandKind, Source};
use ldportal::{Color, FlashPad, Pad, PasswordPolicy};

#[test]
fn color_frame_layout() {
    let frame = Command::Color {
        pad: Pad::Left,
        color: Color::rgb(0xFF, 0x00, 0x80),
    }
    .to_frame(7)
    .unwrap();
    let b = frame.as_bytes();
    assert_eq!(&b[..8], &[0x55, 0x06, 0xC0, 0x07, 0x02, 0xFF, 0x00, 0x80]);
    let sum = b[..8].iter().fold(0u8, |acc, x| acc.wrapping_add(*x));
    assert_eq!(b[8], sum);
    assert!(b[9..].iter().all(|&x| x == 0));
}

#[test]
fn switch_off_all_payload() {
    let cmd = Command::ColorAll([Some(Color::BLACK); 3]);
    assert_eq!(cmd.kind(), CommandKind::ColorAll);
    assert_eq!(cmd.payload(), vec![1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0]);
}

#[test]
fn flash_all_fits_in_one_frame() {
    let flash = FlashPad::new(5, 5, 3, Color::RED);
    let cmd = Command::FlashAll([flash, FlashPad::disabled(), flash]);
    let msg = cmd.to_frame(200).unwrap().decode(Source::Host).unwrap();
    assert_eq!(msg.command_kind(), Some(CommandKind::FlashAll));
    assert_eq!(msg.payload().len(), 21);
}

#[test]
fn write_and_password_frames() {
    let write = Command::Write {
        index: 1,
        page: 0x24,
        data: [0x63, 0x04, 0x00, 0x00],
    };
    let msg = write.to_frame(9).unwrap().decode(Source::Host).unwrap();
    assert_eq!(msg.payload(), &[1, 0x24, 0x63, 0x04, 0x00, 0x00]);

    let pwd = Command::ConfigPassword {
        policy: PasswordPolicy::Disable,
        index: 1,
        password: [0; 4],
    };
    assert_eq!(pwd.kind().code(), 0xE1);
    assert_eq!(pwd.payload()[..2], [0x00, 0x01]);
}
