//! Binary device protocol: constants, message framing, reply parsing.
//!
//! ```text
//! ┌───────────┐   ┌────────────────┐   ┌──────────────────┐
//! │ constants │──▶│ MessageBuilder │◀──│ command library  │
//! │ (operand  │   │ (length/counter│   │ (tone, sensor,   │
//! │  formats) │   │  framing)      │   │  motors)         │
//! └───────────┘   └────────────────┘   └──────────────────┘
//!
//!                 ┌────────────────┐
//!     raw bytes ─▶│ FrameDecoder   │─▶ ReplyFrame stream
//!                 │ (reassembly)   │
//!                 └────────────────┘
//! ```
//!
//! Everything here is pure and transport-agnostic; the bridge layer
//! moves the bytes.

pub mod commands;
pub mod constants;
pub mod frame;
pub mod message;
