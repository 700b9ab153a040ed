//! In-process device host for tests and demos.
//!
//! Scripted scan results, a queue of injectable link events, and a
//! byte pipe in each direction. Everything a real radio would do,
//! minus the radio.

use std::collections::VecDeque;

use crate::bridge::ports::{DeviceHost, LinkEvent, TransportMode};

/// A device the loopback "radio" will report during scans.
#[derive(Debug, Clone)]
pub struct ScriptedDevice {
    pub address: String,
    pub name: Option<String>,
    pub rssi: i16,
}

/// Fake wireless stack backed by in-memory queues.
///
/// `start_scan` immediately queues one `DeviceFound` per scripted
/// device followed by `ScanDone`; `open` queues `Connected` (or
/// `Error` when the address is on the refusal list). Bytes written go
/// to `written`; bytes to be read are staged with [`inject_bytes`].
///
/// [`inject_bytes`]: LoopbackHost::inject_bytes
pub struct LoopbackHost {
    devices: Vec<ScriptedDevice>,
    refuse: Vec<String>,
    events: VecDeque<LinkEvent>,
    inbound: VecDeque<u8>,
    connected: bool,
    /// Everything the bridge wrote, one entry per write call.
    pub written: Vec<Vec<u8>>,
    /// Count of close calls, for teardown assertions.
    pub closes: usize,
}

impl LoopbackHost {
    pub fn new(devices: Vec<ScriptedDevice>) -> Self {
        Self {
            devices,
            refuse: Vec::new(),
            events: VecDeque::new(),
            inbound: VecDeque::new(),
            connected: false,
            written: Vec::new(),
            closes: 0,
        }
    }

    /// Make future `open` calls to `address` fail with an error event.
    pub fn refuse_connect(&mut self, address: &str) {
        self.refuse.push(address.to_owned());
    }

    /// Stage bytes the next read will return, plus a `DataReady` event.
    pub fn inject_bytes(&mut self, data: &[u8]) {
        self.inbound.extend(data);
        self.events.push_back(LinkEvent::DataReady);
    }

    /// Queue an arbitrary event (peer close, mid-link fault, ...).
    pub fn inject_event(&mut self, event: LinkEvent) {
        self.events.push_back(event);
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl DeviceHost for LoopbackHost {
    fn start_scan(&mut self) -> Result<(), String> {
        for d in &self.devices {
            self.events.push_back(LinkEvent::DeviceFound {
                address: d.address.clone(),
                name: d.name.clone(),
                rssi: d.rssi,
            });
        }
        self.events.push_back(LinkEvent::ScanDone);
        Ok(())
    }

    fn open(&mut self, address: &str, _mode: TransportMode) -> Result<(), String> {
        if self.refuse.iter().any(|a| a == address) {
            self.events
                .push_back(LinkEvent::Error(format!("peer {address} refused")));
        } else {
            self.connected = true;
            self.events.push_back(LinkEvent::Connected);
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, String> {
        if !self.connected {
            return Err("not connected".into());
        }
        self.written.push(data.to_vec());
        Ok(data.len())
    }

    fn available(&self) -> usize {
        self.inbound.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, String> {
        let n = buf.len().min(self.inbound.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.inbound.pop_front().expect("length checked");
        }
        Ok(n)
    }

    fn close(&mut self) {
        if self.connected {
            self.closes += 1;
        }
        self.connected = false;
    }

    fn poll_event(&mut self) -> Option<LinkEvent> {
        self.events.pop_front()
    }
}

// ── Tests ────────────────────────────────────────────────────
