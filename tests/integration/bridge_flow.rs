//! Client-visible bridge scenarios: discovery, connect lifecycles,
//! multi-client isolation, and error surfaces.

use serde_json::Value;

use brickbridge::adapters::loopback::{LoopbackHost, ScriptedDevice};
use brickbridge::bridge::channels::ClientEvent;
use brickbridge::bridge::ports::{ClientId, LinkEvent, TransportMode};
use brickbridge::bridge::server::BridgeServer;
use brickbridge::bridge::session::ConnState;

use crate::support::{BRICK_ADDR, Recorder, connect, session};

#[test]
fn discover_acks_then_streams_found_devices() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();

    b.handle_message(r#"{"id":1,"method":"discover"}"#, &mut sink);

    // Ack comes first, before any discovery traffic.
    assert_eq!(sink.sent[0].1["id"], 1);
    assert_eq!(sink.sent[0].1["result"], Value::Null);

    b.poll(&mut sink);
    let found = sink.by_method("didDiscoverPeripheral");
    assert_eq!(found.len(), 2);
    assert_eq!(found[0]["params"]["peripheralId"], BRICK_ADDR);
    assert_eq!(found[0]["params"]["name"], "EV3");
    // Anonymous advertiser gets the placeholder name.
    assert_eq!(found[1]["params"]["name"], "Unknown");
    assert_eq!(b.registry().len(), 2);
}

#[test]
fn rediscovery_replaces_previous_results() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();

    b.handle_message(r#"{"id":1,"method":"discover"}"#, &mut sink);
    b.poll(&mut sink);
    assert_eq!(b.registry().len(), 2);

    // Second scan starts from a clean slate.
    b.handle_message(r#"{"id":2,"method":"discover"}"#, &mut sink);
    assert!(b.registry().is_empty());
    b.poll(&mut sink);
    assert_eq!(b.registry().len(), 2);
}

#[test]
fn low_energy_connect_without_discovery_fails_cleanly() {
    let mut b = session(TransportMode::LowEnergy);
    let mut sink = Recorder::default();

    b.handle_message(
        &format!(r#"{{"id":1,"method":"connect","params":{{"peripheralId":"{BRICK_ADDR}"}}}}"#),
        &mut sink,
    );

    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    let msg = errors[0]["error"]["message"].as_str().unwrap();
    assert!(msg.contains("not found"), "got: {msg}");
    assert!(errors[0].get("id").is_none());
    assert_eq!(b.conn_state(), ConnState::Idle);

    // The session is still usable: discover then connect succeeds.
    b.handle_message(r#"{"id":2,"method":"discover"}"#, &mut sink);
    b.poll(&mut sink);
    b.handle_message(
        &format!(r#"{{"id":3,"method":"connect","params":{{"peripheralId":"{BRICK_ADDR}"}}}}"#),
        &mut sink,
    );
    b.poll(&mut sink);
    assert_eq!(b.conn_state(), ConnState::Connected);
}

#[test]
fn classic_connect_needs_no_discovery() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();

    b.handle_message(
        &format!(r#"{{"id":1,"method":"connect","params":{{"peripheralId":"{BRICK_ADDR}"}}}}"#),
        &mut sink,
    );
    b.poll(&mut sink);
    assert_eq!(b.conn_state(), ConnState::Connected);
    assert_eq!(sink.last()["id"], 1);
}

#[test]
fn reconnect_supersedes_existing_link() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);
    assert!(b.host_mut().is_connected());

    b.handle_message(
        &format!(r#"{{"id":9,"method":"connect","params":{{"peripheralId":"{BRICK_ADDR}"}}}}"#),
        &mut sink,
    );
    b.poll(&mut sink);
    assert_eq!(b.conn_state(), ConnState::Connected);
    assert_eq!(sink.last()["id"], 9);
    // Old link was closed before the new open.
    assert_eq!(b.host_mut().closes, 1);
}

#[test]
fn refused_connect_reports_error_and_idles() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    b.host_mut().refuse_connect(BRICK_ADDR);

    b.handle_message(
        &format!(r#"{{"id":1,"method":"connect","params":{{"peripheralId":"{BRICK_ADDR}"}}}}"#),
        &mut sink,
    );
    b.poll(&mut sink);

    assert_eq!(b.conn_state(), ConnState::Idle);
    let msg = sink.last()["error"]["message"].as_str().unwrap();
    assert!(msg.contains("refused"), "got: {msg}");
}

#[test]
fn mid_link_fault_reverts_to_idle_but_session_survives() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();
    connect(&mut b, &mut sink);

    b.host_mut().inject_event(LinkEvent::Error("radio fault".into()));
    b.poll(&mut sink);
    assert_eq!(b.conn_state(), ConnState::Idle);

    // Client can immediately reconnect on the same session.
    b.handle_message(
        &format!(r#"{{"id":5,"method":"connect","params":{{"peripheralId":"{BRICK_ADDR}"}}}}"#),
        &mut sink,
    );
    b.poll(&mut sink);
    assert_eq!(b.conn_state(), ConnState::Connected);
}

#[test]
fn server_keeps_client_traffic_separate() {
    let mut server = BridgeServer::new(TransportMode::Classic, false, |_: ClientId| {
        LoopbackHost::new(vec![ScriptedDevice {
            address: BRICK_ADDR.into(),
            name: Some("EV3".into()),
            rssi: -48,
        }])
    });
    let mut sink = Recorder::default();

    server.handle_event(ClientEvent::Connected { client_id: 0 }, &mut sink);
    server.handle_event(ClientEvent::Connected { client_id: 1 }, &mut sink);

    server.client_message(0, r#"{"id":1,"method":"discover"}"#, &mut sink);
    server.poll(&mut sink);

    // Only client 0 hears about the scan.
    assert!(!sink.sent.is_empty());
    assert!(sink.sent.iter().all(|(id, _)| *id == 0));

    // Client 1's session is untouched.
    assert!(server.session(1).unwrap().registry().is_empty());

    server.handle_event(ClientEvent::Disconnected { client_id: 0 }, &mut sink);
    assert_eq!(server.session_count(), 1);
}

#[test]
fn requests_before_connect_are_rejected() {
    let mut b = session(TransportMode::Classic);
    let mut sink = Recorder::default();

    b.handle_message(
        r#"{"id":1,"method":"send","params":{"message":"AAE=","encoding":"base64"}}"#,
        &mut sink,
    );
    assert_eq!(sink.last()["error"]["message"], "not connected");

    b.handle_message(r#"{"id":2,"method":"read"}"#, &mut sink);
    assert_eq!(sink.last()["error"]["message"], "not connected");
}
