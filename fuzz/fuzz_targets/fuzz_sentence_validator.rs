//! Fuzz target: `check_frame`
//!
//! Feeds arbitrary completed frames to the validator.  Anything it accepts
//! must carry our name and a matching checksum, and the returned body must
//! be a prefix of the frame.
//!
//! cargo fuzz run fuzz_sentence_validator

#![no_main]

use boiler::protocol::validator::FrameVerdict;
use boiler::protocol::{check_frame, checksum};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|frame: &[u8]| {
    if let Ok(FrameVerdict::Valid(body)) = check_frame(frame, b"SHBCC") {
        assert!(frame.starts_with(body), "body must be a prefix of the frame");
        assert!(body.starts_with(b"SHBC"), "accepted a foreign name");
        assert_eq!(frame.get(body.len()), Some(&b'*'));

        let digits = core::str::from_utf8(&frame[body.len() + 1..body.len() + 3])
            .expect("validated checksum digits are ASCII");
        let received = u8::from_str_radix(digits, 16).expect("validated hex");
        assert_eq!(checksum(body), received);
    }
});
