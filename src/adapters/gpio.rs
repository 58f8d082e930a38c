//! GPIO actuator adapter.
//!
//! Drives the relay and the two status LEDs through `embedded-hal` output
//! pins.  All three outputs on the board are active-low (ON = pin LOW).
//! Pin errors are logged and swallowed: the service writes the relay again
//! on every main-loop pass.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::ActuatorPort;
use crate::fsm::RelayState;
use crate::indicator::Led;

/// Relay plus red/blue LED outputs.
pub struct GpioActuators<R, E, A> {
    relay: R,
    error_led: E,
    activity_led: A,
    /// ON = pin LOW.
    active_low: bool,
    relay_state: Option<RelayState>,
}

impl<R: OutputPin, E: OutputPin, A: OutputPin> GpioActuators<R, E, A> {
    pub fn new(relay: R, error_led: E, activity_led: A, active_low: bool) -> Self {
        Self {
            relay,
            error_led,
            activity_led,
            active_low,
            relay_state: None,
        }
    }

    /// Last relay state written, if any.
    pub fn relay_state(&self) -> Option<RelayState> {
        self.relay_state
    }

    fn drive<P: OutputPin>(pin: &mut P, on: bool, active_low: bool, what: &str) {
        let result = if on != active_low {
            pin.set_high()
        } else {
            pin.set_low()
        };
        if let Err(e) = result {
            warn!("gpio: {what} write failed: {e:?}");
        }
    }
}

impl<R: OutputPin, E: OutputPin, A: OutputPin> ActuatorPort for GpioActuators<R, E, A> {
    fn set_relay(&mut self, state: RelayState) {
        Self::drive(&mut self.relay, state.is_on(), self.active_low, "relay");
        self.relay_state = Some(state);
    }

    fn set_led(&mut self, led: Led, on: bool) {
        match led {
            Led::Error => Self::drive(&mut self.error_led, on, self.active_low, "red LED"),
            Led::Activity => Self::drive(&mut self.activity_led, on, self.active_low, "blue LED"),
        }
    }
}
