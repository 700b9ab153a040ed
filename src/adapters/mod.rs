//! Concrete adapters behind the port traits: a loopback device host
//! for tests/demos and a stdio client transport.

pub mod loopback;
pub mod stdio_link;
