//! Command message assembly.
//!
//! Wire format of one outgoing command:
//!
//! ```text
//! ┌───────────┬────────────┬─────────┬────────────┬─────────────┐
//! │ Length    │ Counter    │ CmdType │ Var header │ Payload     │
//! │ u16 LE    │ u16 LE     │ u8      │ u16 LE     │ opcodes +   │
//! │ body + 2  │ per-build  │         │ loc<<10|gl │ constants   │
//! └───────────┴────────────┴─────────┴────────────┴─────────────┘
//! ```
//!
//! The length covers everything after itself (counter included, hence
//! the +2); the counter increments exactly once per build and wraps
//! modulo 65536. Both are load-bearing wire contracts — a real device
//! correlates replies by counter and frames by length.

/// Command-type tag: direct vs system, reply-expected vs fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    /// Direct command, device sends a reply frame.
    DirectReply = 0x00,
    /// Direct command, no reply.
    DirectNoReply = 0x80,
    /// System command, device sends a reply frame.
    SystemReply = 0x01,
    /// System command, no reply.
    SystemNoReply = 0x81,
}

impl CommandType {
    /// Whether the device will answer this command with a reply frame.
    pub fn expects_reply(self) -> bool {
        matches!(self, Self::DirectReply | Self::SystemReply)
    }
}

/// Reply-type tag carried in inbound frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReplyType {
    DirectReply = 0x02,
    SystemReply = 0x03,
    DirectReplyError = 0x04,
    SystemReplyError = 0x05,
}

impl ReplyType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x02 => Some(Self::DirectReply),
            0x03 => Some(Self::SystemReply),
            0x04 => Some(Self::DirectReplyError),
            0x05 => Some(Self::SystemReplyError),
            _ => None,
        }
    }
}

/// Opcodes of the device instruction set used by the command library.
pub mod opcode {
    pub const SOUND: u8 = 0x94;
    pub const UI_DRAW: u8 = 0x84;
    pub const OUTPUT_STEP_SPEED: u8 = 0xAE;
    pub const OUTPUT_SPEED: u8 = 0xA5;
    pub const OUTPUT_START: u8 = 0xA6;
    pub const OUTPUT_STOP: u8 = 0xA3;
    pub const INPUT_DEVICE: u8 = 0x99;

    /// `SOUND` sub-command: play a tone.
    pub const SOUND_TONE: u8 = 0x01;
    /// `INPUT_DEVICE` sub-command: read a value in SI units.
    pub const INPUT_READY_SI: u8 = 0x1D;
}

/// Assembles framed command messages and owns the message counter.
///
/// The counter is the *only* mutable state; one builder belongs to one
/// logical device connection and must not be shared across sessions
/// (the single-threaded control loop makes that free of locks).
pub struct MessageBuilder {
    counter: u16,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Start from a specific counter value (resuming a connection, or
    /// pinning a known counter in tests).
    pub fn starting_at(counter: u16) -> Self {
        Self { counter }
    }

    /// The counter the *next* built message will carry.
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Build one complete framed message.
    ///
    /// `global_var_bytes` (≤ 1023) and `local_var_bytes` (≤ 63) reserve
    /// scratch memory on the device; out-of-range values are masked to
    /// field width.
    pub fn build(
        &mut self,
        command_type: CommandType,
        payload: &[u8],
        global_var_bytes: u16,
        local_var_bytes: u16,
    ) -> Vec<u8> {
        debug_assert!(global_var_bytes <= 0x3FF, "global var space is 10 bits");
        debug_assert!(local_var_bytes <= 0x3F, "local var space is 6 bits");
        let header = ((local_var_bytes & 0x3F) << 10) | (global_var_bytes & 0x3FF);

        let body_len = 1 + 2 + payload.len();
        debug_assert!(
            body_len + 2 <= usize::from(u16::MAX),
            "message exceeds the 16-bit length field"
        );
        // Counter bytes count toward the length, the length field does not.
        let msg_len = (body_len + 2) as u16;

        let mut out = Vec::with_capacity(2 + body_len + 2);
        out.extend_from_slice(&msg_len.to_le_bytes());
        out.extend_from_slice(&self.counter.to_le_bytes());
        out.push(command_type as u8);
        out.extend_from_slice(&header.to_le_bytes());
        out.extend_from_slice(payload);

        self.counter = self.counter.wrapping_add(1);
        out
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────
