//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the GPIO outputs and the thermistor and fronts the hardware timers,
//! exposing them through [`ActuatorPort`], [`TimerPort`] and
//! [`SensorPort`].  On non-espidf targets the timer and ADC drivers use
//! cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;

use crate::adapters::gpio::GpioActuators;
use crate::app::ports::{ActuatorPort, SensorPort, TimerPort};
use crate::drivers::hw_timer;
use crate::fsm::RelayState;
use crate::indicator::Led;
use crate::sensors::temperature::Thermistor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<R, E, A> {
    outputs: GpioActuators<R, E, A>,
    thermistor: Thermistor,
}

impl<R: OutputPin, E: OutputPin, A: OutputPin> HardwareAdapter<R, E, A> {
    pub fn new(outputs: GpioActuators<R, E, A>, thermistor: Thermistor) -> Self {
        Self {
            outputs,
            thermistor,
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<R: OutputPin, E: OutputPin, A: OutputPin> ActuatorPort for HardwareAdapter<R, E, A> {
    fn set_relay(&mut self, state: RelayState) {
        self.outputs.set_relay(state);
    }

    fn set_led(&mut self, led: Led, on: bool) {
        self.outputs.set_led(led, on);
    }
}

// ── TimerPort implementation ──────────────────────────────────

impl<R: OutputPin, E: OutputPin, A: OutputPin> TimerPort for HardwareAdapter<R, E, A> {
    fn restart_deadline(&mut self) {
        hw_timer::restart_deadline();
    }

    fn start_blink(&mut self, duration_ms: u32) {
        hw_timer::start_blink(duration_ms);
    }

    fn take_deadline_expiry(&mut self) -> bool {
        hw_timer::take_deadline_expiry()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<R: OutputPin, E: OutputPin, A: OutputPin> SensorPort for HardwareAdapter<R, E, A> {
    fn read_temperature(&mut self) -> i32 {
        self.thermistor.read().centi_celsius
    }
}
