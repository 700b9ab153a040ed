//! Shared helpers for the integration scenarios.

use serde_json::Value;

use brickbridge::adapters::loopback::{LoopbackHost, ScriptedDevice};
use brickbridge::bridge::ports::{ClientId, ClientSink, TransportMode};
use brickbridge::bridge::session::{ConnState, SessionBridge};

pub const BRICK_ADDR: &str = "00:16:53:40:CE:B6";

/// Sink that records every outbound message, parsed back to JSON.
#[derive(Default)]
pub struct Recorder {
    pub sent: Vec<(ClientId, Value)>,
}

impl ClientSink for Recorder {
    fn send(&mut self, client_id: ClientId, text: &str) {
        let v: Value = serde_json::from_str(text).expect("bridge emits valid JSON");
        self.sent.push((client_id, v));
    }
}

impl Recorder {
    pub fn last(&self) -> &Value {
        &self.sent.last().expect("expected at least one message").1
    }

    pub fn by_method(&self, method: &str) -> Vec<&Value> {
        self.sent
            .iter()
            .filter(|(_, v)| v["method"] == method)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn errors(&self) -> Vec<&Value> {
        self.sent
            .iter()
            .filter(|(_, v)| v.get("error").is_some())
            .map(|(_, v)| v)
            .collect()
    }
}

pub fn scripted_host() -> LoopbackHost {
    LoopbackHost::new(vec![
        ScriptedDevice {
            address: BRICK_ADDR.into(),
            name: Some("EV3".into()),
            rssi: -48,
        },
        ScriptedDevice {
            address: "00:16:53:00:00:02".into(),
            name: None,
            rssi: -77,
        },
    ])
}

pub fn session(mode: TransportMode) -> SessionBridge<LoopbackHost> {
    SessionBridge::new(0, mode, scripted_host(), false)
}

/// Drive a session through discover + connect until the link is up.
pub fn connect(bridge: &mut SessionBridge<LoopbackHost>, sink: &mut Recorder) {
    bridge.handle_message(r#"{"id":100,"method":"discover"}"#, sink);
    bridge.poll(sink);
    bridge.handle_message(
        &format!(r#"{{"id":101,"method":"connect","params":{{"peripheralId":"{BRICK_ADDR}"}}}}"#),
        sink,
    );
    bridge.poll(sink);
    assert_eq!(bridge.conn_state(), ConnState::Connected);
}
