//! Variable-width constant encoding for the device instruction set.
//!
//! Operands travel as *constants* in one of several formats, selected
//! by the two high bits of the first byte:
//!
//! ```text
//! 00vvvvvv              short form, 6-bit two's-complement, [-31, 31]
//! 0x81 vv               long form, 1 byte follows
//! 0x82 vv vv            long form, 2 bytes follow (LE)
//! 0x83 vv vv vv vv      long form, 4 bytes follow (LE)
//! 0x84 ...utf8... 00    string, zero-terminated
//! 011iiiii              global-variable reference, 5-bit index
//! ```
//!
//! Decoders are provided for the numeric forms; they validate the tag
//! and sign-extend, and exist mainly so tests and tooling can check the
//! encodings round-trip.

use crate::error::EncodingError;

/// Tag byte for the 1-byte long form.
pub const TAG_BYTE: u8 = 0x81;
/// Tag byte for the 2-byte long form.
pub const TAG_SHORT_WORD: u8 = 0x82;
/// Tag byte for the 4-byte long form.
pub const TAG_WORD: u8 = 0x83;
/// Tag byte for the zero-terminated string form.
pub const TAG_STRING: u8 = 0x84;
/// High-bit pattern for a global-variable reference.
pub const TAG_VARIABLE: u8 = 0x60;

/// Inclusive bounds of the short-form domain.
pub const SHORT_MIN: i32 = -31;
pub const SHORT_MAX: i32 = 31;

// ── Encoders ─────────────────────────────────────────────────

/// Encode a short-form constant: one byte, low 6 bits two's-complement.
///
/// Only legal for values in [-31, 31].
pub fn encode_short(v: i32) -> Result<u8, EncodingError> {
    if !(SHORT_MIN..=SHORT_MAX).contains(&v) {
        return Err(EncodingError::ShortOutOfRange(v));
    }
    Ok((v as u8) & 0x3F)
}

/// Encode a long-form constant with one payload byte.
pub fn encode_byte(v: i8) -> [u8; 2] {
    [TAG_BYTE, v as u8]
}

/// Encode a long-form constant with a little-endian i16 payload.
pub fn encode_short_word(v: i16) -> [u8; 3] {
    let le = v.to_le_bytes();
    [TAG_SHORT_WORD, le[0], le[1]]
}

/// Encode a long-form constant with a little-endian i32 payload.
pub fn encode_word(v: i32) -> [u8; 5] {
    let le = v.to_le_bytes();
    [TAG_WORD, le[0], le[1], le[2], le[3]]
}

/// Encode a zero-terminated string constant.
///
/// Interior NUL bytes are rejected — the terminator is the only NUL
/// the device scans for.
pub fn encode_string(s: &str) -> Result<Vec<u8>, EncodingError> {
    if s.as_bytes().contains(&0) {
        return Err(EncodingError::EmbeddedNul);
    }
    let mut out = Vec::with_capacity(s.len() + 2);
    out.push(TAG_STRING);
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    Ok(out)
}

/// Encode a global-variable reference.
///
/// Indices outside [0, 31] silently truncate to their low 5 bits —
/// that is the wire behavior, not an error.
pub fn encode_variable_ref(index: u8) -> u8 {
    TAG_VARIABLE | (index & 0x1F)
}

// ── Decoders ─────────────────────────────────────────────────

/// Decode a short-form constant, sign-extending the low 6 bits.
pub fn decode_short(b: u8) -> Result<i32, EncodingError> {
    if b & 0xC0 != 0 {
        return Err(EncodingError::BadTag(b));
    }
    // Bit 5 is the sign bit of the 6-bit value.
    let v = if b & 0x20 != 0 {
        (b | 0xC0) as i8 as i32
    } else {
        b as i32
    };
    Ok(v)
}

/// Decode a 1-byte long-form constant.
pub fn decode_byte(buf: &[u8]) -> Result<i8, EncodingError> {
    match buf {
        [TAG_BYTE, v, ..] => Ok(*v as i8),
        [t, ..] if *t != TAG_BYTE => Err(EncodingError::BadTag(*t)),
        _ => Err(EncodingError::Truncated),
    }
}

/// Decode a 2-byte long-form constant.
pub fn decode_short_word(buf: &[u8]) -> Result<i16, EncodingError> {
    match buf {
        [TAG_SHORT_WORD, a, b, ..] => Ok(i16::from_le_bytes([*a, *b])),
        [t, ..] if *t != TAG_SHORT_WORD => Err(EncodingError::BadTag(*t)),
        _ => Err(EncodingError::Truncated),
    }
}

/// Decode a 4-byte long-form constant.
pub fn decode_word(buf: &[u8]) -> Result<i32, EncodingError> {
    match buf {
        [TAG_WORD, a, b, c, d, ..] => Ok(i32::from_le_bytes([*a, *b, *c, *d])),
        [t, ..] if *t != TAG_WORD => Err(EncodingError::BadTag(*t)),
        _ => Err(EncodingError::Truncated),
    }
}

// ── Tests ────────────────────────────────────────────────────
