//! JSON-RPC 2.0 envelopes for the client protocol.
//!
//! Requests arrive as text messages; the bridge answers with responses
//! (matched by id), error envelopes, or server-initiated notifications.
//! Error envelopes deliberately carry **no** id — the browser clients
//! this protocol serves treat errors as connection-scoped, and echoing
//! the id would change the wire contract they already handle.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RequestError;

/// Methods a client may invoke.
pub mod method {
    pub const DISCOVER: &str = "discover";
    pub const CONNECT: &str = "connect";
    pub const SEND: &str = "send";
    pub const READ: &str = "read";

    /// Notification: a peripheral was discovered during a scan.
    pub const DID_DISCOVER: &str = "didDiscoverPeripheral";
    /// Notification: bytes arrived from the device.
    pub const DID_RECEIVE: &str = "didReceiveMessage";
}

/// An incoming client request.
///
/// `id` is kept as a raw JSON value — clients may use numbers or
/// strings and must get the same shape back.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// Parse a text message into a request envelope.
    pub fn parse(text: &str) -> Result<Self, RequestError> {
        serde_json::from_str(text).map_err(|_| RequestError::Malformed)
    }
}

/// Parameters of `connect`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectParams {
    #[serde(rename = "peripheralId")]
    pub peripheral_id: String,
}

/// Parameters of `send`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendParams {
    pub message: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    "base64".into()
}

/// Parameters of a `didDiscoverPeripheral` notification.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredParams {
    #[serde(rename = "peripheralId")]
    pub peripheral_id: String,
    pub name: String,
    pub rssi: i16,
}

// ── Outbound envelope builders ───────────────────────────────

/// Success response for `id` with an arbitrary result.
pub fn response(id: &Value, result: Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
    .to_string()
}

/// Error envelope (no id, by protocol).
pub fn error(message: &str) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "error": { "message": message },
    })
    .to_string()
}

/// Server-initiated notification.
pub fn notification(method: &str, params: Value) -> String {
    serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
    })
    .to_string()
}

// ── Tests ────────────────────────────────────────────────────
