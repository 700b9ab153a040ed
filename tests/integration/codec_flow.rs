//! Full command/reply round trips: typed command builders through the
//! bridge, device replies back out as notifications.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use brickbridge::bridge::ports::TransportMode;
use brickbridge::proto::commands::{play_tone, read_sensor};
use brickbridge::proto::frame::FrameDecoder;
use brickbridge::proto::message::MessageBuilder;

use crate::support::{Recorder, connect, session};

#[test]
fn tone_command_travels_intact_to_the_device() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);

    let tone = play_tone(&mut MessageBuilder::new(), 2, 1000, 1000, false);
    let encoded = BASE64.encode(&tone);
    b.handle_message(
        &format!(r#"{{"id":1,"method":"send","params":{{"message":"{encoded}","encoding":"base64"}}}}"#),
        &mut sink,
    );

    // Ack carries the byte count; the device saw the exact frame.
    assert_eq!(sink.last()["result"], tone.len());
    assert_eq!(b.host_mut().written, vec![tone]);
}

#[test]
fn sensor_query_reply_surfaces_as_notification() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);

    let query = read_sensor(&mut MessageBuilder::new(), 1, 0).unwrap();
    let encoded = BASE64.encode(&query);
    b.handle_message(
        &format!(r#"{{"id":1,"method":"send","params":{{"message":"{encoded}"}}}}"#),
        &mut sink,
    );

    // Device answers: direct reply, counter 0, 25.4 as LE float.
    let mut reply = vec![0x07, 0x00, 0x00, 0x00, 0x02];
    reply.extend_from_slice(&25.4f32.to_le_bytes());
    b.host_mut().inject_bytes(&reply);

    b.handle_message(r#"{"id":2,"method":"read"}"#, &mut sink);

    let got = sink.by_method("didReceiveMessage");
    assert_eq!(got.len(), 1);
    assert_eq!(got[0]["params"]["encoding"], "base64");

    let wire = BASE64
        .decode(got[0]["params"]["message"].as_str().unwrap())
        .unwrap();
    let mut d = FrameDecoder::new();
    d.push(&wire);
    let frames = d.drain_frames();
    assert_eq!(frames.len(), 1);
    assert!((frames[0].sensor_value().unwrap() - 25.4).abs() < f32::EPSILON);
}

#[test]
fn split_reply_needs_both_reads() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);

    let reply = [0x05, 0x00, 0x02, 0x00, 0x02, 0x11, 0x22];

    // First half arrives; a read yields nothing yet.
    b.host_mut().inject_bytes(&reply[..3]);
    b.handle_message(r#"{"id":1,"method":"read"}"#, &mut sink);
    assert!(sink.by_method("didReceiveMessage").is_empty());

    // Remainder arrives; the frame completes.
    b.host_mut().inject_bytes(&reply[3..]);
    b.handle_message(r#"{"id":2,"method":"read"}"#, &mut sink);
    assert_eq!(sink.by_method("didReceiveMessage").len(), 1);
}

#[test]
fn coalesced_replies_fan_out_one_notification_each() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);

    let mut wire = Vec::new();
    for counter in 0u16..3 {
        wire.extend_from_slice(&[0x03, 0x00]);
        wire.extend_from_slice(&counter.to_le_bytes());
        wire.push(0x02);
    }
    b.host_mut().inject_bytes(&wire);

    b.handle_message(r#"{"id":1,"method":"read"}"#, &mut sink);
    assert_eq!(sink.by_method("didReceiveMessage").len(), 3);
}

#[test]
fn runt_frame_is_skipped_and_later_frames_still_arrive() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);

    let mut wire = vec![0x01, 0x00]; // length 1: can't hold counter + type
    wire.extend_from_slice(&[0x03, 0x00, 0x07, 0x00, 0x02]);
    b.host_mut().inject_bytes(&wire);

    b.handle_message(r#"{"id":1,"method":"read"}"#, &mut sink);
    let got = sink.by_method("didReceiveMessage");
    assert_eq!(got.len(), 1);
    let decoded = BASE64
        .decode(got[0]["params"]["message"].as_str().unwrap())
        .unwrap();
    assert_eq!(decoded[2], 0x07); // the valid frame, counter 7
}

#[test]
fn raw_encoding_sends_utf8_bytes_verbatim() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);

    b.handle_message(
        r#"{"id":1,"method":"send","params":{"message":"hello","encoding":"text"}}"#,
        &mut sink,
    );
    assert_eq!(sink.last()["result"], 5);
    assert_eq!(b.host_mut().written, vec![b"hello".to_vec()]);
}

#[test]
fn bad_base64_is_rejected_without_touching_the_link() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);

    b.handle_message(
        r#"{"id":1,"method":"send","params":{"message":"%%%not-base64%%%"}}"#,
        &mut sink,
    );
    let msg = sink.last()["error"]["message"].as_str().unwrap();
    assert!(msg.contains("payload"), "got: {msg}");
    assert!(b.host_mut().written.is_empty());
}
