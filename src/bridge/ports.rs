//! Port traits — the boundary between the bridge core and the outside
//! world.
//!
//! ```text
//!   client I/O adapter ──▶ ClientSink ──▶ (text back to the browser)
//!   radio/RF adapter   ──▶ DeviceHost ──▶ SessionBridge (core)
//! ```
//!
//! The session bridge is generic over [`DeviceHost`], so swapping the
//! wireless stack (real RF, loopback, recorded traces) requires zero
//! changes to the bridge logic.

/// Client identifier (slot index assigned by the message-stream server).
pub type ClientId = u8;

/// Which flavor of wireless transport a session drives.
///
/// The two are mutually exclusive per session — a tagged choice, never
/// two optional handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Classic serial-profile transport (RFCOMM-style).
    Classic,
    /// Low-energy transport; connecting requires a discovery record.
    LowEnergy,
}

/// Asynchronous happenings on the device side, polled by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A peripheral answered the scan.
    DeviceFound {
        address: String,
        name: Option<String>,
        rssi: i16,
    },
    /// The scan window closed.
    ScanDone,
    /// A previously requested `open` completed.
    Connected,
    /// The link failed (connect failure or mid-connection fault).
    Error(String),
    /// Inbound bytes are waiting to be read.
    DataReady,
    /// The peer closed the link.
    Closed,
}

/// One session's window onto the wireless stack: discovery plus at most
/// one open connection.
///
/// `open` completes asynchronously — the host reports the outcome via
/// [`LinkEvent::Connected`] or [`LinkEvent::Error`]. `read` and `write`
/// are non-blocking.
pub trait DeviceHost {
    /// Begin a discovery scan. Results arrive as `DeviceFound` events.
    fn start_scan(&mut self) -> Result<(), String>;

    /// Begin opening a connection to `address`.
    fn open(&mut self, address: &str, mode: TransportMode) -> Result<(), String>;

    /// Write bytes to the open connection; returns bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize, String>;

    /// Bytes currently readable without blocking.
    fn available(&self) -> usize;

    /// Read up to `buf.len()` bytes. Returns 0 when nothing is pending.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, String>;

    /// Tear down any open or half-open connection. Idempotent.
    fn close(&mut self);

    /// Pull the next pending event, if any.
    fn poll_event(&mut self) -> Option<LinkEvent>;
}

/// Delivery of text messages back to clients.
///
/// The control loop hands one of these to every dispatch call; adapters
/// decide where the text goes (a channel to the socket thread, a test
/// recorder, stdout).
pub trait ClientSink {
    fn send(&mut self, client_id: ClientId, text: &str);
}
