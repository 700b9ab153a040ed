//! Command library — named device commands as pure builders.
//!
//! Each function turns typed parameters into one framed command message
//! via the caller's [`MessageBuilder`], concatenating an opcode, a
//! sub-opcode or layer byte, and encoded operands. The byte sequences
//! here match the reference device firmware; changing them breaks real
//! hardware.

use crate::error::Result;
use crate::proto::constants::{encode_byte, encode_short, encode_short_word, encode_variable_ref};
use crate::proto::message::{CommandType, MessageBuilder, opcode};

/// Daisy-chain layer 0 — the locally connected brick.
const LAYER_0: i32 = 0;

/// Play a tone through the device speaker.
///
/// `volume` is 0–100; `frequency_hz` and `duration_ms` are bounded by
/// the 2-byte signed operand format.
pub fn play_tone(
    builder: &mut MessageBuilder,
    volume: i8,
    frequency_hz: i16,
    duration_ms: i16,
    expect_reply: bool,
) -> Vec<u8> {
    let command_type = if expect_reply {
        CommandType::DirectReply
    } else {
        CommandType::DirectNoReply
    };

    let mut payload = vec![opcode::SOUND, opcode::SOUND_TONE];
    payload.extend_from_slice(&encode_byte(volume));
    payload.extend_from_slice(&encode_short_word(frequency_hz));
    payload.extend_from_slice(&encode_short_word(duration_ms));

    builder.build(command_type, &payload, 0, 0)
}

/// Read one sensor value in SI units.
///
/// Always reply-expected: the device writes a 4-byte float into the
/// reserved global-variable space and returns it in the reply payload
/// (see [`ReplyFrame::sensor_value`](crate::proto::frame::ReplyFrame::sensor_value)).
pub fn read_sensor(builder: &mut MessageBuilder, port: u8, mode: u8) -> Result<Vec<u8>> {
    let mut payload = vec![opcode::INPUT_DEVICE, opcode::INPUT_READY_SI];
    payload.push(encode_short(LAYER_0)?);
    payload.push(encode_short(i32::from(port))?);
    payload.push(encode_short(0)?); // keep the autodetected sensor type
    payload.push(encode_short(i32::from(mode))?);
    payload.push(encode_short(1)?); // one dataset
    payload.push(encode_variable_ref(0));

    Ok(builder.build(CommandType::DirectReply, &payload, 4, 0))
}

/// Start motors at a speed, as two concatenated sub-commands:
/// set-speed then start.
///
/// `motor_mask` selects outputs (bit 0 = A … bit 3 = D); `speed_percent`
/// is -100..=100.
pub fn start_motor(builder: &mut MessageBuilder, motor_mask: u8, speed_percent: i8) -> Result<Vec<u8>> {
    let mask = encode_short(i32::from(motor_mask))?;

    let mut payload = vec![opcode::OUTPUT_SPEED, 0x00];
    payload.push(mask);
    payload.extend_from_slice(&encode_byte(speed_percent));
    payload.extend_from_slice(&[opcode::OUTPUT_START, 0x00]);
    payload.push(mask);

    Ok(builder.build(CommandType::DirectNoReply, &payload, 0, 0))
}

/// Stop motors, braking or coasting.
pub fn stop_motor(builder: &mut MessageBuilder, motor_mask: u8, brake: bool) -> Result<Vec<u8>> {
    let mut payload = vec![opcode::OUTPUT_STOP, 0x00];
    payload.push(encode_short(i32::from(motor_mask))?);
    payload.push(encode_short(i32::from(brake))?);

    Ok(builder.build(CommandType::DirectNoReply, &payload, 0, 0))
}

// ── Tests ────────────────────────────────────────────────────
