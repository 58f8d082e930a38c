//! Error types for the boiler relay firmware.
//!
//! All variants are `Copy` so a rejected sentence can be reported through
//! the event sink without allocation.  Peripheral setup failures are typed
//! next to their drivers and surface through `anyhow` in the firmware
//! entry point.
//!
//! None of these ever reach the relay: a rejected sentence simply leaves the
//! last good command in place and raises the error LED.

use core::fmt;

// ---------------------------------------------------------------------------
// Sentence errors
// ---------------------------------------------------------------------------

/// Why a frame carrying the expected message name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceError {
    /// A control byte (below 0x20, other than CR/LF) was found in the frame,
    /// which means the radio link corrupted the transmission.
    TransmissionError { offset: usize, byte: u8 },
    /// No `*` checksum delimiter in the frame.
    MissingChecksum,
    /// The two characters after `*` are not hex digits.
    MalformedChecksum,
    /// Computed XOR checksum disagrees with the transmitted one.
    ChecksumMismatch { computed: u8, received: u8 },
}

impl fmt::Display for SentenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransmissionError { offset, byte } => {
                write!(f, "transmission error: byte 0x{byte:02X} at offset {offset}")
            }
            Self::MissingChecksum => write!(f, "missing checksum delimiter"),
            Self::MalformedChecksum => write!(f, "malformed checksum field"),
            Self::ChecksumMismatch { computed, received } => write!(
                f,
                "checksum mismatch: computed {computed:02X}, received {received:02X}"
            ),
        }
    }
}

impl std::error::Error for SentenceError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
