//! Bridge configuration parameters
//!
//! All tunable parameters for the bridge process. Values come from
//! defaults, overridden per-run by CLI flags.

use serde::{Deserialize, Serialize};

use crate::bridge::ports::TransportMode;

/// Core bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    // --- Transport ---
    /// Wireless transport flavor every session drives.
    pub transport: TransportMode,

    // --- Timing ---
    /// Control loop poll interval (milliseconds)
    pub poll_interval_ms: u64,

    // --- Delivery ---
    /// Push complete device frames as soon as they arrive, instead of
    /// holding them for the next `read` request.
    pub eager_push: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            transport: TransportMode::Classic,
            poll_interval_ms: 5, // 200 Hz
            eager_push: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = BridgeConfig::default();
        assert!(c.poll_interval_ms > 0);
        assert_eq!(c.transport, TransportMode::Classic);
    }

    #[test]
    fn serde_roundtrip() {
        let c = BridgeConfig {
            transport: TransportMode::LowEnergy,
            poll_interval_ms: 10,
            eager_push: true,
        };
        let json = serde_json::to_string(&c).unwrap();
        let c2: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c2.transport, TransportMode::LowEnergy);
        assert_eq!(c2.poll_interval_ms, 10);
        assert!(c2.eager_push);
    }

    #[test]
    fn transport_mode_serializes_lowercase() {
        let json = serde_json::to_string(&TransportMode::LowEnergy).unwrap();
        assert_eq!(json, r#""lowenergy""#);
        assert_eq!(
            serde_json::from_str::<TransportMode>(r#""classic""#).unwrap(),
            TransportMode::Classic
        );
    }
}
