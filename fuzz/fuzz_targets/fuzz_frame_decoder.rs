//! Fuzz target: `FrameDecoder`
//!
//! Drives arbitrary byte sequences into the streaming reply decoder and
//! asserts that it never panics, every yielded frame is internally
//! consistent, and a reset leaves the decoder usable.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use brickbridge::proto::frame::FrameDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::new();

    // Feed the input in two chunks to exercise reassembly paths.
    let mid = data.len() / 2;
    decoder.push(&data[..mid]);
    let mut frames = decoder.drain_frames();
    decoder.push(&data[mid..]);
    frames.extend(decoder.drain_frames());

    for f in &frames {
        // Declared length covers counter + type + payload.
        assert_eq!(f.size as usize, f.payload.len() + 3);
        // Re-serialization must reproduce a parseable frame.
        let mut check = FrameDecoder::new();
        check.push(&f.wire_bytes());
        assert_eq!(check.drain_frames().len(), 1);
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    decoder.push(data);
    let _ = decoder.drain_frames();
});
