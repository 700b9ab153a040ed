//! Streaming reply-frame decoder.
//!
//! Inbound frame format:
//!
//! ```text
//! ┌───────────┬────────────┬───────────┬──────────────┐
//! │ Length    │ Counter    │ ReplyType │ Payload      │
//! │ u16 LE    │ u16 LE     │ u8        │ length − 3 B │
//! └───────────┴────────────┴───────────┴──────────────┘
//! ```
//!
//! The decoder accumulates bytes across reads and yields complete
//! frames. A serial-like transport gives no framing guarantees: one
//! read may return half a header, half a payload, or several frames
//! back to back. "Not enough bytes yet" is never an error — callers
//! just feed more. A declared length too small to hold the counter and
//! type byte can never become a valid frame; it is reported once and
//! skipped so the stream resynchronizes.

use crate::error::FrameError;
use crate::proto::message::ReplyType;

/// One complete reply frame parsed off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyFrame {
    /// Declared length (bytes after the length field).
    pub size: u16,
    /// Counter of the command this frame answers.
    pub counter: u16,
    /// Raw reply-type tag.
    pub reply_type: u8,
    /// Remaining bytes after the 5-byte header.
    pub payload: Vec<u8>,
}

impl ReplyFrame {
    /// Typed view of the reply tag, if it is one the protocol defines.
    pub fn kind(&self) -> Option<ReplyType> {
        ReplyType::from_tag(self.reply_type)
    }

    /// Whether the device flagged this reply as an error.
    pub fn is_error(&self) -> bool {
        matches!(
            self.kind(),
            Some(ReplyType::DirectReplyError | ReplyType::SystemReplyError)
        )
    }

    /// Sensor replies carry a 4-byte little-endian IEEE-754 float in
    /// the reserved global-variable space. Best effort: any other
    /// payload shape yields `None`, which is not an error.
    pub fn sensor_value(&self) -> Option<f32> {
        let bytes: [u8; 4] = self.payload.as_slice().try_into().ok()?;
        Some(f32::from_le_bytes(bytes))
    }

    /// Re-serialize the frame exactly as it appeared on the wire.
    pub fn wire_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(5 + self.payload.len());
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.counter.to_le_bytes());
        out.push(self.reply_type);
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Outcome of one [`FrameDecoder::next_frame`] attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A complete frame was sliced off the buffer.
    Frame(ReplyFrame),
    /// Not enough buffered bytes yet — feed more input.
    NeedMore,
    /// The buffered length prefix can never frame a valid message;
    /// the bogus frame was skipped.
    Malformed(FrameError),
}

/// Streaming decoder: push bytes in, pull complete frames out.
///
/// Restartable — `next_frame` may be called any number of times between
/// `push` calls and yields each complete frame exactly once.
pub struct FrameDecoder {
    buf: Vec<u8>,
}

/// Length field + counter field + type byte.
const MIN_FRAME: usize = 5;

impl FrameDecoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append raw transport bytes to the reassembly buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Number of buffered, not-yet-decoded bytes.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Attempt to slice one complete frame off the front of the buffer.
    pub fn next_frame(&mut self) -> Decoded {
        if self.buf.len() < 2 {
            return Decoded::NeedMore;
        }
        let size = u16::from_le_bytes([self.buf[0], self.buf[1]]);

        // The counter and type byte live inside the declared length; a
        // smaller length cannot frame anything.
        if (size as usize) < MIN_FRAME - 2 {
            self.buf.drain(..2);
            return Decoded::Malformed(FrameError::Runt(size));
        }

        let total = 2 + size as usize;
        if self.buf.len() < total {
            return Decoded::NeedMore;
        }

        let frame: Vec<u8> = self.buf.drain(..total).collect();
        Decoded::Frame(ReplyFrame {
            size,
            counter: u16::from_le_bytes([frame[2], frame[3]]),
            reply_type: frame[4],
            payload: frame[5..].to_vec(),
        })
    }

    /// Drain every currently complete frame, dropping malformed ones.
    pub fn drain_frames(&mut self) -> Vec<ReplyFrame> {
        let mut frames = Vec::new();
        loop {
            match self.next_frame() {
                Decoded::Frame(f) => frames.push(f),
                Decoded::Malformed(e) => {
                    log::warn!("frame decoder: skipping {e}");
                }
                Decoded::NeedMore => break,
            }
        }
        frames
    }

    /// Discard all buffered bytes (e.g. after a link reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────
