//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BoilerService (domain)
//! ```
//!
//! Driven adapters (relay and LED pins, hardware timers, the thermistor, the
//! RF UART, event sinks) implement these traits.  The
//! [`BoilerService`](super::service::BoilerService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::fsm::RelayState;
use crate::indicator::Led;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the relay and the two status LEDs.
///
/// Implementations must never fail visibly: a write error is logged and
/// the next main-loop pass writes the relay again.
pub trait ActuatorPort {
    /// Drive the boiler relay.
    fn set_relay(&mut self, state: RelayState);

    /// Drive one status LED.
    fn set_led(&mut self, led: Led, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain → hardware timers)
// ───────────────────────────────────────────────────────────────

/// The dead-man countdown and the shared LED blink timer.
///
/// Expiries come back as [`Event`](crate::events::Event)s through the
/// event queue.  The deadline also raises a flag before its event is
/// queued, so the main loop can see an expiry the queue has not delivered
/// yet.
pub trait TimerPort {
    /// Restart the dead-man countdown from zero.
    fn restart_deadline(&mut self);

    /// (Re)start the one-shot blink timeout.
    fn start_blink(&mut self, duration_ms: u32);

    /// Consume the pending deadline-expiry flag.
    fn take_deadline_expiry(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Blocking temperature read.  Main loop only.
pub trait SensorPort {
    /// Boiler temperature in 1/100 °C.
    fn read_temperature(&mut self) -> i32;
}

// ───────────────────────────────────────────────────────────────
// Byte source (driven adapter: RF link → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking receive side of the RF serial link.
pub trait ByteSource {
    /// Next received byte, or `None` if nothing is pending.
    fn next_byte(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
