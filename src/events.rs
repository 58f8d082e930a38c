//! Timer-driven event system.
//!
//! Events are produced by the deadline and blink timer callbacks, which
//! both run in the single esp_timer task.  The main loop is the only
//! consumer and hands them one at a time to
//! [`BoilerService::handle_event`](crate::app::service::BoilerService::handle_event).
//! Received UART bytes do not go through the queue: the main loop reads
//! them itself and feeds them to the service directly.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Deadline    │────▶│  EventQueue  │────▶│  Main Loop   │◀── UART RX
//! │ Blink       │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! [`Event::ByteReceived`] stays in the vocabulary so byte streams can be
//! replayed through the same handler in tests and the host simulation.

use core::sync::atomic::{AtomicU16, AtomicUsize, Ordering};

/// Maximum number of pending events (one slot is kept empty).
/// Power of 2 for efficient ring buffer modulo.
pub const EVENT_QUEUE_CAP: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One byte arrived on the RF serial link.
    ByteReceived(u8),
    /// The dead-man countdown elapsed without an OFF refresh.
    DeadlineExpired,
    /// The shared LED blink timeout elapsed.
    BlinkExpired,
}

const TAG_BYTE: u16 = 0x0100;
const TAG_DEADLINE: u16 = 0x0200;
const TAG_BLINK: u16 = 0x0300;

impl Event {
    fn encode(self) -> u16 {
        match self {
            Self::ByteReceived(b) => TAG_BYTE | u16::from(b),
            Self::DeadlineExpired => TAG_DEADLINE,
            Self::BlinkExpired => TAG_BLINK,
        }
    }

    fn decode(raw: u16) -> Option<Self> {
        match raw & 0xFF00 {
            TAG_BYTE => Some(Self::ByteReceived((raw & 0x00FF) as u8)),
            TAG_DEADLINE => Some(Self::DeadlineExpired),
            TAG_BLINK => Some(Self::BlinkExpired),
            _ => None,
        }
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Exactly one producer context (the esp_timer task) writes, the main loop
// reads.  Slots are atomics so the queue is `Sync` without any `unsafe`.

pub struct EventQueue {
    head: AtomicUsize,
    tail: AtomicUsize,
    slots: [AtomicU16; EVENT_QUEUE_CAP],
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            slots: [const { AtomicU16::new(0) }; EVENT_QUEUE_CAP],
        }
    }

    /// Push an event.  Single producer only.
    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % EVENT_QUEUE_CAP;

        if next_head == tail {
            return false;
        }

        self.slots[head].store(event.encode(), Ordering::Relaxed);
        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Pop the next event.  Single consumer only.
    pub fn pop(&self) -> Option<Event> {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            let head = self.head.load(Ordering::Acquire);
            if tail == head {
                return None;
            }

            let raw = self.slots[tail].load(Ordering::Relaxed);
            self.tail
                .store((tail + 1) % EVENT_QUEUE_CAP, Ordering::Release);
            if let Some(event) = Event::decode(raw) {
                return Some(event);
            }
        }
    }

    /// Drain all pending events in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Acquire)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
    }
}

/// Process-wide queue shared by the timer callbacks and the main loop.
pub static EVENTS: EventQueue = EventQueue::new();

/// Push onto [`EVENTS`].  Returns `false` if the event was dropped.
pub fn push_event(event: Event) -> bool {
    EVENTS.push(event)
}

/// Drain [`EVENTS`] into a callback.
pub fn drain_events(handler: impl FnMut(Event)) {
    EVENTS.drain(handler);
}
