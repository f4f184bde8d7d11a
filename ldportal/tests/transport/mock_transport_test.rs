use std::thread;
use std::time::{Duration, Instant};

use ldportal::protocol::{CommandKind, Frame};
use ldportal::test_support::response_frame;
use ldportal::transport::{MockTransport, Transport};
use ldportal::Error;

#[test]
fn read_times_out_with_none() {
    let mock = MockTransport::new();
    let start = Instant::now();
    assert!(mock.read_frame(Duration::from_millis(20)).unwrap().is_none());
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn injected_frames_come_out_in_order() {
    let mock = MockTransport::new();
    mock.push_frame(response_frame(1, &[1]).unwrap());
    mock.push_frame(response_frame(2, &[2]).unwrap());
    assert_eq!(mock.pending_incoming(), 2);
    let a = mock.read_frame(Duration::ZERO).unwrap().unwrap();
    let b = mock.read_frame(Duration::ZERO).unwrap().unwrap();
    assert_eq!(a.as_bytes()[2], 1);
    assert_eq!(b.as_bytes()[2], 2);
}

#[test]
fn blocked_reader_wakes_on_push() {
    let mock = MockTransport::new();
    let reader = mock.clone();
    let handle = thread::spawn(move || reader.read_frame(Duration::from_secs(2)));
    thread::sleep(Duration::from_millis(20));
    mock.push_frame(response_frame(9, &[]).unwrap());
    let frame = handle.join().unwrap().unwrap();
    assert!(frame.is_some());
}

#[test]
fn responder_answers_writes() {
    let mock = MockTransport::with_responder(|msg| {
        vec![response_frame(msg.id(), &[0xAB]).unwrap()]
    });
    let frame = Frame::encode(CommandKind::GetColor, 5, &[1]).unwrap();
    mock.write_frame(&frame).unwrap();
    assert_eq!(mock.sent(), vec![frame]);
    assert_eq!(mock.sent_messages()[0].id(), 5);
    let reply = mock.read_frame(Duration::ZERO).unwrap().unwrap();
    assert_eq!(reply.as_bytes()[2], 5);
}

#[test]
fn write_failures_then_recovery() {
    let mock = MockTransport::new();
    mock.set_write_failures(2);
    let frame = Frame::encode(CommandKind::Color, 1, &[1, 0, 0, 0]).unwrap();
    assert!(matches!(mock.write_frame(&frame), Err(Error::TransportTimeout)));
    assert!(matches!(mock.write_frame(&frame), Err(Error::TransportTimeout)));
    mock.write_frame(&frame).unwrap();
    assert_eq!(mock.sent().len(), 1);
}

#[test]
fn close_is_idempotent_and_unblocks_readers() {
    let mock = MockTransport::new();
    let reader = mock.clone();
    let handle = thread::spawn(move || reader.read_frame(Duration::from_secs(5)));
    thread::sleep(Duration::from_millis(20));
    mock.close().unwrap();
    mock.close().unwrap();
    assert!(handle.join().unwrap().unwrap().is_none());
    assert!(mock.is_closed());
    let frame = Frame::encode(CommandKind::Wake, 1, &[]).unwrap();
    assert!(mock.write_frame(&frame).is_err());
}
