//! Multi-client session table.
//!
//! Fixed slots indexed by [`ClientId`]; the client I/O adapter assigns
//! slot numbers, this table keeps one isolated [`SessionBridge`] per
//! occupied slot. Sessions never share discovery results or links —
//! each gets its own [`DeviceHost`] from the factory.

use log::{info, warn};

use super::channels::ClientEvent;
use super::ports::{ClientId, ClientSink, DeviceHost, TransportMode};
use super::session::SessionBridge;

/// Maximum simultaneous client sessions.
pub const MAX_CLIENTS: usize = 4;

/// One bridge session per connected client.
pub struct BridgeServer<H, F>
where
    H: DeviceHost,
    F: FnMut(ClientId) -> H,
{
    slots: [Option<SessionBridge<H>>; MAX_CLIENTS],
    make_host: F,
    mode: TransportMode,
    eager_push: bool,
}

impl<H, F> BridgeServer<H, F>
where
    H: DeviceHost,
    F: FnMut(ClientId) -> H,
{
    pub fn new(mode: TransportMode, eager_push: bool, make_host: F) -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            make_host,
            mode,
            eager_push,
        }
    }

    pub fn session_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn session(&self, client_id: ClientId) -> Option<&SessionBridge<H>> {
        self.slots.get(client_id as usize)?.as_ref()
    }

    /// Route one client event to the owning session.
    pub fn handle_event(&mut self, event: ClientEvent, sink: &mut impl ClientSink) {
        match event {
            ClientEvent::Connected { client_id } => self.client_connected(client_id),
            ClientEvent::Message { client_id, text } => {
                self.client_message(client_id, &text, sink);
            }
            ClientEvent::Disconnected { client_id } => self.client_disconnected(client_id),
        }
    }

    pub fn client_connected(&mut self, client_id: ClientId) {
        let Some(slot) = self.slots.get_mut(client_id as usize) else {
            warn!("client id {client_id} out of range, ignoring");
            return;
        };
        if slot.is_some() {
            // Stale session in a reused slot: the old client is gone.
            warn!("slot {client_id} reused before teardown, dropping old session");
        }
        info!("client {client_id} connected");
        let host = (self.make_host)(client_id);
        *slot = Some(SessionBridge::new(
            client_id,
            self.mode,
            host,
            self.eager_push,
        ));
    }

    pub fn client_message(&mut self, client_id: ClientId, text: &str, sink: &mut impl ClientSink) {
        match self.slots.get_mut(client_id as usize).and_then(Option::as_mut) {
            Some(session) => session.handle_message(text, sink),
            None => warn!("message for unknown client {client_id}, dropping"),
        }
    }

    pub fn client_disconnected(&mut self, client_id: ClientId) {
        let Some(slot) = self.slots.get_mut(client_id as usize) else {
            return;
        };
        if let Some(session) = slot.as_mut() {
            info!("client {client_id} disconnected");
            session.teardown();
        }
        *slot = None;
    }

    /// Poll every live session's device host for link events.
    pub fn poll(&mut self, sink: &mut impl ClientSink) {
        for session in self.slots.iter_mut().flatten() {
            session.poll(sink);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
