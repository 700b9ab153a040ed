//! Session bridge core: per-client state machines, discovery registry,
//! the multi-client session table, and the channels that connect the
//! control loop to the client I/O thread.

pub mod channels;
pub mod ports;
pub mod registry;
pub mod server;
pub mod session;
