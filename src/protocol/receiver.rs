//! Byte-at-a-time frame accumulator (RawFrame).
//!
//! Fed one byte per call from the receive handler.  Never blocks and never
//! fails: malformed input is absorbed by resetting or wrapping the cursor.
//!
//! ## Buffer invariants
//!
//! - At most [`MAX_FRAME_LEN`]` - 1` payload bytes are stored; the last slot
//!   is reserved so the byte after the cursor is always `0`.
//! - `$` and LF are never stored.  CR is stored and tolerated by the
//!   validator.
//! - When the cursor reaches capacity it wraps to the start rather than
//!   overrunning; the resulting frame will fail its checksum.

use log::debug;

use super::{END_DELIMITER, MAX_FRAME_LEN, START_DELIMITER};

/// Streaming frame receiver.
pub struct FrameReceiver {
    buf: [u8; MAX_FRAME_LEN],
    cursor: usize,
    /// A start delimiter was seen since the last end delimiter.
    synced: bool,
    overflows: u32,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReceiver {
    /// Payload bytes that fit before the cursor wraps.
    pub const CAPACITY: usize = MAX_FRAME_LEN - 1;

    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_FRAME_LEN],
            cursor: 0,
            synced: false,
            overflows: 0,
        }
    }

    /// Feed one received byte.
    ///
    /// Returns `Some(frame)` when an end delimiter completes a frame that
    /// began with a start delimiter.  The slice holds everything between the
    /// two delimiters and is valid until the next call.
    pub fn push(&mut self, byte: u8) -> Option<&[u8]> {
        match byte {
            START_DELIMITER => {
                self.restart();
                self.synced = true;
                None
            }
            END_DELIMITER => {
                let len = self.cursor;
                let synced = self.synced;
                self.cursor = 0;
                self.synced = false;
                if synced {
                    Some(&self.buf[..len])
                } else {
                    debug!("receiver: dropped {len} bytes without start delimiter");
                    None
                }
            }
            _ => {
                if self.cursor >= Self::CAPACITY {
                    self.overflows = self.overflows.wrapping_add(1);
                    debug!("receiver: frame overflow, wrapping");
                    self.cursor = 0;
                }
                self.buf[self.cursor] = byte;
                self.cursor += 1;
                self.buf[self.cursor] = 0;
                None
            }
        }
    }

    /// Bytes accumulated for the frame in progress.
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.cursor]
    }

    /// Number of bytes accumulated for the frame in progress.
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// The byte following the stored content is a `0` terminator.
    pub fn is_terminated(&self) -> bool {
        self.cursor < MAX_FRAME_LEN && self.buf[self.cursor] == 0
    }

    /// Times the cursor wrapped because a frame outgrew the buffer.
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    fn restart(&mut self) {
        self.cursor = 0;
        self.buf[0] = 0;
    }
}
