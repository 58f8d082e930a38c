//! Sentence validation and the LastGoodSentence mailbox.
//!
//! The integrity gate between the radio and the relay: nothing reaches the
//! command dispatcher unless it carries the expected message name, contains
//! no control bytes, and matches its XOR checksum.
//!
//! ## Checksum rule
//!
//! XOR of every byte between `$` and `*` (the receiver has already dropped
//! the `$`).  The two characters after `*` are parsed as hex, either case,
//! and compared numerically.  Anything after those two digits (the CR) is
//! ignored.  The published sentence is the frame cut at `*`.

use heapless::Vec;
use log::debug;

use crate::error::SentenceError;

use super::{CARRIAGE_RETURN, CHECKSUM_DELIMITER, END_DELIMITER, MAX_FRAME_LEN, NAME_LEN};

/// XOR-fold a byte slice.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Outcome of checking a frame that did not fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVerdict<'a> {
    /// Frame is intact; carries the sentence body cut at `*`.
    Valid(&'a [u8]),
    /// Different sentence type; not ours to judge.
    Foreign,
}

/// Check a completed frame against the expected message name.
///
/// Only the first [`NAME_LEN`] bytes of `name` take part in the comparison.
pub fn check_frame<'a>(frame: &'a [u8], name: &[u8]) -> Result<FrameVerdict<'a>, SentenceError> {
    let prefix = &name[..name.len().min(NAME_LEN)];
    if prefix.len() < NAME_LEN || !frame.starts_with(prefix) {
        return Ok(FrameVerdict::Foreign);
    }

    if let Some((offset, &byte)) = frame
        .iter()
        .enumerate()
        .find(|&(_, &b)| b < 0x20 && b != CARRIAGE_RETURN && b != END_DELIMITER)
    {
        return Err(SentenceError::TransmissionError { offset, byte });
    }

    let star = frame
        .iter()
        .position(|&b| b == CHECKSUM_DELIMITER)
        .ok_or(SentenceError::MissingChecksum)?;
    let body = &frame[..star];
    let computed = checksum(body);

    let received = frame
        .get(star + 1..star + 3)
        .and_then(parse_hex_pair)
        .ok_or(SentenceError::MalformedChecksum)?;

    if computed != received {
        return Err(SentenceError::ChecksumMismatch { computed, received });
    }
    Ok(FrameVerdict::Valid(body))
}

fn parse_hex_pair(digits: &[u8]) -> Option<u8> {
    let hi = (digits[0] as char).to_digit(16)?;
    let lo = (digits[1] as char).to_digit(16)?;
    Some(((hi << 4) | lo) as u8)
}

// ---------------------------------------------------------------------------
// LastGoodSentence
// ---------------------------------------------------------------------------

/// Result of handing a frame to [`LastGoodSentence::validate_and_publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    /// The frame replaced the last good sentence.
    Accepted,
    /// The frame was a different sentence type and was ignored.
    Ignored,
}

/// Most recent validated sentence plus the frame-ready flag.
///
/// Seeded with a sentinel (the bare message name) that can never carry a
/// command.  Overwritten only on full validation success, in one bulk copy.
pub struct LastGoodSentence {
    sentence: Vec<u8, MAX_FRAME_LEN>,
    sentinel: Vec<u8, MAX_FRAME_LEN>,
    ready: bool,
}

impl LastGoodSentence {
    /// Create the mailbox holding `sentinel`.  Input longer than a frame is
    /// truncated.
    pub fn new(sentinel: &[u8]) -> Self {
        let sentinel = &sentinel[..sentinel.len().min(MAX_FRAME_LEN)];
        let mut stored = Vec::new();
        // Length checked above.
        let _ = stored.extend_from_slice(sentinel);
        Self {
            sentence: stored.clone(),
            sentinel: stored,
            ready: false,
        }
    }

    /// Validate `frame` and, on success, publish it as the last good sentence.
    ///
    /// The ready flag is raised for every frame that was processed, including
    /// ignored and rejected ones: the main loop only ever dispatches what is
    /// currently published.
    pub fn validate_and_publish(&mut self, frame: &[u8]) -> Result<Publish, SentenceError> {
        let verdict = check_frame(frame, &self.sentence);
        self.ready = true;
        match verdict? {
            FrameVerdict::Valid(body) => {
                self.sentence.clear();
                // A body is a strict prefix of a frame, so it always fits.
                let _ = self.sentence.extend_from_slice(body);
                debug!("validator: published {:?}", core::str::from_utf8(body));
                Ok(Publish::Accepted)
            }
            FrameVerdict::Foreign => Ok(Publish::Ignored),
        }
    }

    /// Consume the ready flag.  Returns the published sentence if a frame was
    /// processed since the last call.
    pub fn take_ready(&mut self) -> Option<&[u8]> {
        if core::mem::take(&mut self.ready) {
            Some(&self.sentence)
        } else {
            None
        }
    }

    /// Restore the sentinel so a consumed command is never dispatched twice.
    pub fn reset(&mut self) {
        self.sentence.clone_from(&self.sentinel);
    }

    /// Currently published sentence.
    pub fn as_bytes(&self) -> &[u8] {
        &self.sentence
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_sentinel(&self) -> bool {
        self.sentence == self.sentinel
    }
}
