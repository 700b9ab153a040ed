//! Session bridge — one per connected client.
//!
//! Routes JSON-RPC requests to discovery/connect/send/read operations
//! on the owned [`DeviceHost`], and forwards host-side events back to
//! the client as responses or notifications.
//!
//! ```text
//!            request text                    LinkEvent
//!  client ───────────────▶ ┌──────────────┐ ◀─────────── device host
//!                          │ SessionBridge │
//!  client ◀─────────────── │  (dispatch)   │ ───────────▶ device host
//!        responses /       └──────────────┘  scan · open
//!        notifications                       write · read
//! ```
//!
//! State machine: connection state {Idle → Connecting → Connected →
//! Idle} plus an independent scan-active flag — a discover may run
//! while connected. Completion of `connect` is asynchronous: the ack
//! is held as a pending request id until the host reports the outcome.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, info, warn};
use serde_json::Value;

use crate::error::RequestError;
use crate::proto::frame::FrameDecoder;
use crate::rpc::envelope::{self, ConnectParams, DiscoveredParams, Request, SendParams, method};

use super::ports::{ClientId, ClientSink, DeviceHost, LinkEvent, TransportMode};
use super::registry::DeviceRegistry;

/// Read chunk size when draining the link.
const READ_BUF_SIZE: usize = 1024;

/// Cap on remembered outgoing counters awaiting replies.
const MAX_PENDING_REPLIES: usize = 32;

/// Connection half of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// No transport.
    Idle,
    /// `open` issued, outcome not yet reported.
    Connecting,
    /// Link open; read/write enabled.
    Connected,
}

/// Bridge state for one client connection.
pub struct SessionBridge<H: DeviceHost> {
    client_id: ClientId,
    mode: TransportMode,
    host: H,
    conn: ConnState,
    registry: DeviceRegistry,
    decoder: FrameDecoder,
    /// Request id of the connect awaiting a link outcome.
    pending_connect: Option<Value>,
    /// Counters of sent commands with no reply seen yet (correlation).
    sent_counters: heapless::Vec<u16, MAX_PENDING_REPLIES>,
    /// Push complete frames on DataReady without waiting for `read`.
    eager_push: bool,
    /// Cleared on client disconnect; a dead session routes nothing.
    active: bool,
}

impl<H: DeviceHost> SessionBridge<H> {
    pub fn new(client_id: ClientId, mode: TransportMode, host: H, eager_push: bool) -> Self {
        Self {
            client_id,
            mode,
            host,
            conn: ConnState::Idle,
            registry: DeviceRegistry::new(),
            decoder: FrameDecoder::new(),
            pending_connect: None,
            sent_counters: heapless::Vec::new(),
            eager_push,
            active: true,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn conn_state(&self) -> ConnState {
        self.conn
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Direct access to the owned device host, for adapters that need
    /// to feed it out-of-band (and for scripted hosts in tests).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ── Client request dispatch ───────────────────────────────

    /// Handle one text message from the owning client.
    pub fn handle_message(&mut self, text: &str, sink: &mut impl ClientSink) {
        if !self.active {
            return;
        }

        let req = match Request::parse(text) {
            Ok(r) => r,
            Err(e) => {
                warn!("session[{}]: unparseable request", self.client_id);
                return self.send_error(sink, &e);
            }
        };

        let id = req.id.clone().unwrap_or(Value::Null);
        match req.method.as_str() {
            method::DISCOVER => self.handle_discover(&id, sink),
            method::CONNECT => self.handle_connect(&id, req.params, sink),
            method::SEND => self.handle_send(&id, req.params, sink),
            method::READ => self.handle_read(sink),
            other => {
                warn!("session[{}]: unknown method '{}'", self.client_id, other);
                self.send_error(sink, &RequestError::UnknownMethod(other.to_owned()));
            }
        }
    }

    fn handle_discover(&mut self, id: &Value, sink: &mut impl ClientSink) {
        info!("session[{}]: discover", self.client_id);
        self.registry.start_scan();
        if let Err(reason) = self.host.start_scan() {
            warn!("session[{}]: scan start failed: {}", self.client_id, reason);
            self.registry.on_scan_finished();
            sink.send(self.client_id, &envelope::error(&format!("scan failed: {reason}")));
            return;
        }
        // Ack right away: devices arrive later as notifications.
        sink.send(self.client_id, &envelope::response(id, Value::Null));
    }

    fn handle_connect(&mut self, id: &Value, params: Option<Value>, sink: &mut impl ClientSink) {
        if self.pending_connect.is_some() {
            return self.send_error(sink, &RequestError::ConnectPending);
        }

        let Some(p) = params.and_then(|v| serde_json::from_value::<ConnectParams>(v).ok()) else {
            return self.send_error(sink, &RequestError::Malformed);
        };

        // Low-energy connects need the discovery record, not just an
        // address — without it the radio has nothing to dial. Checked
        // before any teardown: a rejected connect must leave an
        // existing link untouched.
        if self.mode == TransportMode::LowEnergy
            && self.registry.lookup(&p.peripheral_id).is_none()
        {
            return self.send_error(
                sink,
                &RequestError::PeripheralNotFound(p.peripheral_id),
            );
        }

        // A fresh connect supersedes an existing link.
        if self.conn == ConnState::Connected {
            info!("session[{}]: reconnect, tearing down old link", self.client_id);
            self.drop_link();
        }

        info!(
            "session[{}]: connecting to {} ({:?})",
            self.client_id, p.peripheral_id, self.mode
        );
        if let Err(reason) = self.host.open(&p.peripheral_id, self.mode) {
            warn!("session[{}]: open failed: {}", self.client_id, reason);
            self.conn = ConnState::Idle;
            sink.send(self.client_id, &envelope::error(&format!("connect failed: {reason}")));
            return;
        }

        self.conn = ConnState::Connecting;
        self.pending_connect = Some(id.clone());
    }

    fn handle_send(&mut self, id: &Value, params: Option<Value>, sink: &mut impl ClientSink) {
        if self.conn != ConnState::Connected {
            return self.send_error(sink, &RequestError::NotConnected);
        }

        let Some(p) = params.and_then(|v| serde_json::from_value::<SendParams>(v).ok()) else {
            return self.send_error(sink, &RequestError::Malformed);
        };

        let payload: Vec<u8> = if p.encoding == "base64" {
            match BASE64.decode(p.message.as_bytes()) {
                Ok(b) => b,
                Err(_) => return self.send_error(sink, &RequestError::BadPayload),
            }
        } else {
            p.message.into_bytes()
        };

        match self.host.write(&payload) {
            Ok(written) => {
                self.remember_counter(&payload);
                debug!("session[{}]: wrote {} bytes", self.client_id, written);
                sink.send(self.client_id, &envelope::response(id, Value::from(written)));
            }
            Err(reason) => {
                warn!("session[{}]: write failed: {}", self.client_id, reason);
                self.drop_link();
                sink.send(self.client_id, &envelope::error(&format!("write failed: {reason}")));
            }
        }
    }

    fn handle_read(&mut self, sink: &mut impl ClientSink) {
        if self.conn != ConnState::Connected {
            return self.send_error(sink, &RequestError::NotConnected);
        }
        // Pull-style poll; nothing pending means no response at all,
        // so clients can poll harmlessly.
        self.drain_inbound(sink);
    }

    // ── Link event handling ───────────────────────────────────

    /// Drain and dispatch every pending host event.
    pub fn poll(&mut self, sink: &mut impl ClientSink) {
        if !self.active {
            return;
        }
        while let Some(event) = self.host.poll_event() {
            self.handle_link_event(event, sink);
            if !self.active {
                break;
            }
        }
    }

    fn handle_link_event(&mut self, event: LinkEvent, sink: &mut impl ClientSink) {
        match event {
            LinkEvent::DeviceFound { address, name, rssi } => {
                debug!(
                    "session[{}]: found {} ({})",
                    self.client_id,
                    address,
                    name.as_deref().unwrap_or("?")
                );
                self.registry.on_discovered(&address, name, rssi);
                if self.registry.scan_active() {
                    let device = self
                        .registry
                        .lookup(&address)
                        .expect("entry inserted just above");
                    let params = DiscoveredParams {
                        peripheral_id: address.clone(),
                        name: device.display_name().to_owned(),
                        rssi,
                    };
                    sink.send(
                        self.client_id,
                        &envelope::notification(
                            method::DID_DISCOVER,
                            serde_json::to_value(params).expect("static shape"),
                        ),
                    );
                }
            }

            LinkEvent::ScanDone => {
                info!(
                    "session[{}]: scan finished, {} device(s)",
                    self.client_id,
                    self.registry.len()
                );
                self.registry.on_scan_finished();
            }

            LinkEvent::Connected => {
                info!("session[{}]: link connected", self.client_id);
                self.conn = ConnState::Connected;
                if let Some(id) = self.pending_connect.take() {
                    sink.send(self.client_id, &envelope::response(&id, Value::Null));
                }
            }

            LinkEvent::Error(reason) => {
                warn!("session[{}]: link error: {}", self.client_id, reason);
                self.drop_link();
                sink.send(self.client_id, &envelope::error(&format!("link error: {reason}")));
            }

            LinkEvent::DataReady => {
                if self.eager_push && self.conn == ConnState::Connected {
                    self.drain_inbound(sink);
                }
            }

            LinkEvent::Closed => {
                if self.conn != ConnState::Idle {
                    warn!("session[{}]: link closed by peer", self.client_id);
                    self.drop_link();
                    sink.send(self.client_id, &envelope::error("link closed"));
                }
            }
        }
    }

    // ── Teardown ──────────────────────────────────────────────

    /// Client went away: close the owned link and stop routing events.
    ///
    /// Must run before any further event dispatch for this session so
    /// in-flight link events are dropped, never delivered to a reused
    /// client slot.
    pub fn teardown(&mut self) {
        info!("session[{}]: teardown", self.client_id);
        self.active = false;
        self.drop_link();
    }

    // ── Internal ──────────────────────────────────────────────

    /// Read everything currently available and push one notification
    /// per complete reply frame.
    fn drain_inbound(&mut self, sink: &mut impl ClientSink) {
        let mut buf = [0u8; READ_BUF_SIZE];
        while self.host.available() > 0 {
            match self.host.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => self.decoder.push(&buf[..n]),
                Err(reason) => {
                    warn!("session[{}]: read failed: {}", self.client_id, reason);
                    self.drop_link();
                    sink.send(
                        self.client_id,
                        &envelope::error(&format!("read failed: {reason}")),
                    );
                    return;
                }
            }
        }

        for frame in self.decoder.drain_frames() {
            self.correlate(frame.counter);
            let params = serde_json::json!({
                "message": BASE64.encode(frame.wire_bytes()),
                "encoding": "base64",
            });
            sink.send(
                self.client_id,
                &envelope::notification(method::DID_RECEIVE, params),
            );
        }
    }

    /// Remember the counter of an outgoing frame so replies can be
    /// tagged solicited/unsolicited.
    fn remember_counter(&mut self, message: &[u8]) {
        if message.len() < 4 {
            return;
        }
        let counter = u16::from_le_bytes([message[2], message[3]]);
        if self.sent_counters.is_full() {
            self.sent_counters.remove(0);
        }
        let _ = self.sent_counters.push(counter);
    }

    fn correlate(&mut self, counter: u16) {
        match self.sent_counters.iter().position(|c| *c == counter) {
            Some(pos) => {
                self.sent_counters.remove(pos);
            }
            None => {
                debug!(
                    "session[{}]: unsolicited reply (counter {})",
                    self.client_id, counter
                );
            }
        }
    }

    /// Close the link and return to Idle, forgetting in-flight state.
    fn drop_link(&mut self) {
        self.host.close();
        self.conn = ConnState::Idle;
        self.pending_connect = None;
        self.decoder.reset();
        self.sent_counters.clear();
    }

    fn send_error(&mut self, sink: &mut impl ClientSink, e: &RequestError) {
        sink.send(self.client_id, &envelope::error(&e.to_string()));
    }
}

// ── Tests ────────────────────────────────────────────────────
