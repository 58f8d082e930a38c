//! Sentence protocol spoken over the RF serial link.
//!
//! Wire format (one frame per line, NMEA-style):
//! ```text
//! $SHBCC,OFF*3A\r\n
//! │└─┬─┘ └┬┘ └┬┘└─┬─┘
//! │ name  │   │  line ending (LF ends the frame)
//! │       │   checksum: XOR of every byte between '$' and '*', 2 hex digits
//! │       command field (index 1)
//! start delimiter
//! ```
//!
//! ```text
//! byte ──▶ FrameReceiver ──▶ LastGoodSentence::validate_and_publish
//!                                   │ (take on main loop)
//!                                   ▼
//!                      fields::extract_field ──▶ RelayCommand
//! ```

pub mod fields;
pub mod receiver;
pub mod validator;

use heapless::String;

pub use fields::{RelayCommand, extract_field};
pub use receiver::FrameReceiver;
pub use validator::{LastGoodSentence, Publish, checksum, check_frame};

/// Maximum frame size in bytes, delimiters included.
pub const MAX_FRAME_LEN: usize = 82;
/// Marks the start of a frame; not stored.
pub const START_DELIMITER: u8 = b'$';
/// Ends a frame (line feed).
pub const END_DELIMITER: u8 = b'\n';
/// Carriage return preceding the end delimiter on the wire.
pub const CARRIAGE_RETURN: u8 = b'\r';
/// Precedes the two hex checksum digits.
pub const CHECKSUM_DELIMITER: u8 = b'*';
/// Separates fields.
pub const FIELD_DELIMITER: u8 = b',';
/// Length of the message-name prefix compared against the expected name.
pub const NAME_LEN: usize = 4;

/// Encode a sentence as it appears on the wire: `$NAME,f1,..*HH\r\n`.
///
/// Returns `None` if the result would not fit in a single frame.
pub fn encode_sentence(name: &str, fields: &[&str]) -> Option<String<MAX_FRAME_LEN>> {
    let mut body: String<MAX_FRAME_LEN> = String::new();
    body.push_str(name).ok()?;
    for field in fields {
        body.push(FIELD_DELIMITER as char).ok()?;
        body.push_str(field).ok()?;
    }

    let sum = checksum(body.as_bytes());
    let mut out: String<MAX_FRAME_LEN> = String::new();
    out.push(START_DELIMITER as char).ok()?;
    out.push_str(&body).ok()?;
    out.push(CHECKSUM_DELIMITER as char).ok()?;
    out.push(hex_digit(sum >> 4)).ok()?;
    out.push(hex_digit(sum & 0x0F)).ok()?;
    out.push_str("\r\n").ok()?;
    Some(out)
}

fn hex_digit(nibble: u8) -> char {
    char::from_digit(u32::from(nibble), 16)
        .unwrap_or('0')
        .to_ascii_uppercase()
}
