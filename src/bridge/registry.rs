//! Per-session registry of peripherals seen during a discovery scan.
//!
//! Keyed by address; rediscovery overwrites; nothing expires on its own
//! — a new scan clears the table. Each session owns its registry, so no
//! client ever sees (or connects through) another client's discoveries.

use std::collections::HashMap;
use std::time::Instant;

/// One discovered peripheral.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    pub address: String,
    /// Advertised name; absent for anonymous advertisers.
    pub name: Option<String>,
    pub rssi: i16,
    pub discovered_at: Instant,
}

impl DiscoveredDevice {
    /// Name to show a client when the peripheral advertised none.
    pub const PLACEHOLDER_NAME: &'static str = "Unknown";

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(Self::PLACEHOLDER_NAME)
    }
}

/// Registry of one discovery cycle's findings.
pub struct DeviceRegistry {
    entries: HashMap<String, DiscoveredDevice>,
    scan_active: bool,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            scan_active: false,
        }
    }

    /// Start a new discovery cycle: drop all previous findings.
    pub fn start_scan(&mut self) {
        self.entries.clear();
        self.scan_active = true;
    }

    /// Record (or refresh) a discovery event.
    pub fn on_discovered(&mut self, address: &str, name: Option<String>, rssi: i16) {
        self.entries.insert(
            address.to_owned(),
            DiscoveredDevice {
                address: address.to_owned(),
                name,
                rssi,
                discovered_at: Instant::now(),
            },
        );
    }

    /// The scan window closed; entries stay until the next scan.
    pub fn on_scan_finished(&mut self) {
        self.scan_active = false;
    }

    pub fn lookup(&self, address: &str) -> Option<&DiscoveredDevice> {
        self.entries.get(address)
    }

    pub fn scan_active(&self) -> bool {
        self.scan_active
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────
