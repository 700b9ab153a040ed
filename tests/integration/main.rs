//! End-to-end tests: full client scenarios through the session bridge
//! over the loopback device host.

mod support;

mod bridge_flow;
mod codec_flow;
