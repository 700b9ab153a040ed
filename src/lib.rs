//! brickbridge — JSON-RPC bridge and binary codec for brick robots.
//!
//! Translates JSON-RPC 2.0 text messages from browser-style clients
//! into a binary command protocol spoken over serial-like wireless
//! links, one isolated session per client.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  stdio_link            loopback                            │
//! │  (client transport)    (DeviceHost for tests/demos)        │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────        │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │  bridge (core logic)                             │      │
//! │  │  BridgeServer · SessionBridge · DeviceRegistry   │      │
//! │  └──────────────────────────────────────────────────┘      │
//! │                                                            │
//! │  rpc (JSON-RPC envelopes) · proto (binary wire codec)      │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

pub mod adapters;
pub mod bridge;
pub mod config;
pub mod error;
pub mod proto;
pub mod rpc;
