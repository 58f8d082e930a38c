//! Fuzz target: `FrameReceiver::push` into `LastGoodSentence`
//!
//! Drives arbitrary byte sequences through the receiver and the validator
//! and asserts that framing never overruns its buffer and that a dispatch
//! pass always consumes the published sentence.
//!
//! cargo fuzz run fuzz_frame_receiver

#![no_main]

use boiler::protocol::{FrameReceiver, LastGoodSentence, extract_field};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut rx = FrameReceiver::new();
    let mut last = LastGoodSentence::new(b"SHBCC");

    for &b in data {
        if let Some(frame) = rx.push(b) {
            assert!(frame.len() <= FrameReceiver::CAPACITY, "frame exceeds buffer");
            let _ = last.validate_and_publish(frame);
        }
        assert!(rx.is_terminated(), "receive buffer lost its terminator");
    }

    if let Some(sentence) = last.take_ready() {
        let field = extract_field(sentence, 1);
        assert!(field.len() <= sentence.len());
    }
    last.reset();
    assert!(last.is_sentinel());
});
