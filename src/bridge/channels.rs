//! Inter-thread communication channels.
//!
//! Uses `embassy-sync` bounded MPMC channels to bridge the client I/O
//! thread with the synchronous control loop. Both sides share these
//! static channels; senders never block the control loop.
//!
//! ```text
//! ┌──────────────┐  ClientEvent  ┌───────────────┐
//! │  I/O thread  │─────────────▶│  Control Loop  │
//! │  (stdio/ws)  │◀─────────────│  (sync)        │
//! └──────────────┘  OutboundMsg  └───────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use super::ports::{ClientId, ClientSink};

/// Inbound happenings on the client side, delivered to the control loop.
pub enum ClientEvent {
    /// A client attached and was assigned a slot.
    Connected { client_id: ClientId },
    /// One text message from a client.
    Message { client_id: ClientId, text: String },
    /// The client went away; its session must be torn down.
    Disconnected { client_id: ClientId },
}

/// Outbound text from the control loop, destined for one client.
pub struct OutboundMsg {
    pub client_id: ClientId,
    pub text: String,
}

/// Channel depth for client (inbound) events.
const EVENT_DEPTH: usize = 16;

/// Channel depth for outbound messages. Deeper than inbound: one
/// request can fan out into many notifications.
const OUT_DEPTH: usize = 64;

/// Inbound event channel: I/O thread → control loop.
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, ClientEvent, EVENT_DEPTH> =
    Channel::new();

/// Outbound message channel: control loop → I/O thread.
pub static OUT_CHANNEL: Channel<CriticalSectionRawMutex, OutboundMsg, OUT_DEPTH> = Channel::new();

/// Sink that forwards into [`OUT_CHANNEL`] without blocking.
///
/// A full channel means the I/O side stopped draining; the message is
/// dropped rather than stalling every session behind one dead client.
pub struct ChannelSink;

impl ClientSink for ChannelSink {
    fn send(&mut self, client_id: ClientId, text: &str) {
        let msg = OutboundMsg {
            client_id,
            text: text.to_owned(),
        };
        if OUT_CHANNEL.try_send(msg).is_err() {
            warn!("outbound channel full, dropping message for client {client_id}");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
