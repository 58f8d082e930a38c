//! Outbound application events.
//!
//! The [`BoilerService`](super::service::BoilerService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; in the firmware they go to the serial
//! log.

use serde::Serialize;

use crate::error::SentenceError;
use crate::fsm::RelayState;
use crate::protocol::RelayCommand;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has run its power-on self test (carries the relay output).
    Started(RelayState),

    /// A frame passed validation and became the last good sentence.
    SentenceAccepted,

    /// A frame with our message name failed validation.
    SentenceRejected(SentenceError),

    /// A command was dispatched from the last good sentence.
    CommandApplied(RelayCommand),

    /// The physical relay output changed.
    RelayChanged { from: RelayState, to: RelayState },

    /// The dead-man countdown expired.
    FailSafeTripped,

    /// The thermal override latched.
    EmergencyEntered { temp_centi: i32 },

    /// The thermal override released.
    EmergencyCleared { temp_centi: i32 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// Link and fail-safe counters since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub accepted: u32,
    pub rejected: u32,
    pub ignored: u32,
    pub overflows: u32,
    pub fail_safe_trips: u32,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryData {
    pub relay: RelayState,
    pub commanded: RelayState,
    pub emergency: bool,
    /// Last sampled temperature, 1/100 °C.
    pub temperature_centi: Option<i32>,
    pub link: LinkStats,
    pub uptime_ticks: u64,
}
