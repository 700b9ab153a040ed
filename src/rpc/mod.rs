//! Client-facing JSON-RPC layer.

pub mod envelope;
