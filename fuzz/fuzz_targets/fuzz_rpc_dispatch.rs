//! Fuzz target: session request dispatch
//!
//! Throws arbitrary text at a live session and asserts the bridge
//! never panics and only ever answers with valid JSON.
//!
//! cargo fuzz run fuzz_rpc_dispatch

#![no_main]

use brickbridge::adapters::loopback::{LoopbackHost, ScriptedDevice};
use brickbridge::bridge::ports::{ClientId, ClientSink, TransportMode};
use brickbridge::bridge::session::SessionBridge;
use libfuzzer_sys::fuzz_target;

struct ValidJsonSink;

impl ClientSink for ValidJsonSink {
    fn send(&mut self, _client_id: ClientId, text: &str) {
        let v: serde_json::Value =
            serde_json::from_str(text).expect("bridge must emit valid JSON");
        assert!(v.get("jsonrpc").is_some());
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let host = LoopbackHost::new(vec![ScriptedDevice {
        address: "00:16:53:00:00:01".into(),
        name: Some("EV3".into()),
        rssi: -50,
    }]);
    let mut session = SessionBridge::new(0, TransportMode::Classic, host, false);
    let mut sink = ValidJsonSink;

    session.handle_message(text, &mut sink);
    session.poll(&mut sink);

    // The session must survive anything a client sends.
    session.handle_message(r#"{"id":1,"method":"discover"}"#, &mut sink);
    session.poll(&mut sink);
});
