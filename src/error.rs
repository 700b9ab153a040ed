//! Unified error types for the bridge.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the control loop's error handling uniform. Client-facing errors are
//! turned into JSON-RPC error envelopes at the session layer; nothing
//! in here ever terminates the process.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level bridge error
// ---------------------------------------------------------------------------

/// Every fallible operation in the bridge funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A protocol constant could not be encoded.
    Encoding(EncodingError),
    /// A client request was malformed or not serviceable.
    Request(RequestError),
    /// The inbound byte stream violated the frame format.
    Frame(FrameError),
    /// The underlying device link failed.
    Link(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding(e) => write!(f, "encoding: {e}"),
            Self::Request(e) => write!(f, "request: {e}"),
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Link(msg) => write!(f, "link: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Constant-encoding errors
// ---------------------------------------------------------------------------

/// Failures when encoding a value into the device's constant formats.
///
/// Fatal to the one command build, never to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    /// Value outside the short-form domain [-31, 31].
    ShortOutOfRange(i32),
    /// A string operand contained an interior NUL byte.
    EmbeddedNul,
    /// A decoder saw a format tag it did not expect.
    BadTag(u8),
    /// A decoder ran out of input before the encoded value ended.
    Truncated,
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortOutOfRange(v) => write!(f, "{v} outside short-constant range [-31, 31]"),
            Self::EmbeddedNul => write!(f, "string operand contains NUL"),
            Self::BadTag(t) => write!(f, "unexpected constant tag 0x{t:02X}"),
            Self::Truncated => write!(f, "encoded constant truncated"),
        }
    }
}

impl From<EncodingError> for Error {
    fn from(e: EncodingError) -> Self {
        Self::Encoding(e)
    }
}

// ---------------------------------------------------------------------------
// Client request errors
// ---------------------------------------------------------------------------

/// Errors reported back to the client as JSON-RPC error envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The message was not decodable as a request envelope.
    Malformed,
    /// The request named a method the bridge does not implement.
    UnknownMethod(String),
    /// `send`/`read` was attempted without an open device link.
    NotConnected,
    /// A second `connect` arrived while one was still pending.
    ConnectPending,
    /// `connect` named a peripheral the registry has never seen.
    PeripheralNotFound(String),
    /// `send` carried a payload that did not decode per its encoding.
    BadPayload,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "invalid request"),
            Self::UnknownMethod(m) => write!(f, "unknown method: {m}"),
            Self::NotConnected => write!(f, "not connected"),
            Self::ConnectPending => write!(f, "connect already pending"),
            Self::PeripheralNotFound(id) => {
                write!(f, "peripheral {id} not found, discover first")
            }
            Self::BadPayload => write!(f, "message payload not decodable"),
        }
    }
}

impl From<RequestError> for Error {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

// ---------------------------------------------------------------------------
// Frame errors
// ---------------------------------------------------------------------------

/// Violations of the reply-frame format.
///
/// An incomplete frame is *not* an error — the decoder simply waits for
/// more bytes. These cover frames that can never become valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Declared length too small to hold counter + type (< 3).
    Runt(u16),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runt(len) => write!(f, "runt frame (declared length {len})"),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Bridge-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
